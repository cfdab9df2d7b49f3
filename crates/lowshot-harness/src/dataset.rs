//! Dataset directory preflight.
//!
//! Sessions read raw data from a local mirror of the benchmark
//! datasets. The layout is checked up front so a missing mount fails
//! before any session is created.

use std::path::Path;

use lowshot_core::config::Environment;
use lowshot_core::errors::ConfigError;

/// Subdirectory required in every environment.
const EXTERNAL_DIR: &str = "external";

/// Verify `dataset_dir` exists and contains both the split directory
/// this environment serves and `external/`.
pub fn validate_layout(dataset_dir: &Path, environment: Environment) -> Result<(), ConfigError> {
    if !dataset_dir.is_dir() {
        return Err(ConfigError::DatasetDirMissing {
            path: dataset_dir.display().to_string(),
        });
    }
    for subdir in [environment.working_dir(), EXTERNAL_DIR] {
        if !dataset_dir.join(subdir).is_dir() {
            return Err(ConfigError::DatasetLayoutInvalid {
                path: dataset_dir.display().to_string(),
                subdir: subdir.to_string(),
            });
        }
    }
    tracing::debug!("harness: dataset layout ok at {}", dataset_dir.display());
    Ok(())
}
