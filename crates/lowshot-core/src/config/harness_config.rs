use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{ApiConfig, Environment, RunConfig};
use crate::errors::ConfigError;
use crate::models::{DataSplit, ProblemType};

/// File name searched for in the run root.
pub const PROJECT_CONFIG_FILE: &str = "lowshot.toml";

/// Flag values that take precedence over every other layer.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    /// Explicit config file; replaces the `lowshot.toml` lookup.
    pub config_file: Option<PathBuf>,
    pub environment: Option<Environment>,
    pub team_secret: Option<String>,
    pub dataset_dir: Option<PathBuf>,
    pub data_splits: Option<Vec<DataSplit>>,
    pub problem_types: Option<Vec<ProblemType>>,
    pub task_id: Option<String>,
    pub skip_datasets: Option<Vec<String>>,
    pub session_name_prefix: Option<String>,
    pub session_name_postfix: Option<String>,
}

/// Complete harness configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    pub api: ApiConfig,
    pub run: RunConfig,
}

impl HarnessConfig {
    /// Resolve configuration for a run rooted at `root`.
    ///
    /// Layers, weakest first: compiled defaults, `lowshot.toml` under
    /// `root` (or the file named in `cli`), `LOWSHOT_*` environment
    /// variables, then CLI flags. The result is validated.
    pub fn load(root: &Path, cli: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let explicit = cli.and_then(|c| c.config_file.as_deref());
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => {
                let project = root.join(PROJECT_CONFIG_FILE);
                if project.is_file() {
                    Self::from_file(&project)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env();
        if let Some(cli) = cli {
            config.apply_cli(cli);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        toml::from_str(&raw).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|e| ConfigError::ParseError {
            path: "<inline>".to_string(),
            message: e.to_string(),
        })
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<inline>".to_string(),
            message: e.to_string(),
        })
    }

    /// Environment variables override file values. Unparsable values
    /// are ignored.
    fn apply_env(&mut self) {
        if let Ok(val) = std::env::var("LOWSHOT_ENVIRONMENT") {
            if let Ok(env) = val.parse() {
                self.api.environment = env;
            }
        }
        if let Ok(val) = std::env::var("LOWSHOT_TEAM_SECRET") {
            self.api.team_secret = val;
        }
        if let Ok(val) = std::env::var("LOWSHOT_TIMEOUT_SECS") {
            if let Ok(n) = val.parse() {
                self.api.timeout_secs = n;
            }
        }
        if let Ok(val) = std::env::var("LOWSHOT_MAX_RETRIES") {
            if let Ok(n) = val.parse() {
                self.api.retry.max_retries = n;
            }
        }
        if let Ok(val) = std::env::var("LOWSHOT_DATASET_DIR") {
            self.run.dataset_dir = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("LOWSHOT_TASK_ID") {
            self.run.task_id = Some(val);
        }
        if let Ok(val) = std::env::var("LOWSHOT_SKIP_DATASETS") {
            self.run.skip_datasets = val
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
    }

    fn apply_cli(&mut self, cli: &CliOverrides) {
        if let Some(env) = cli.environment {
            self.api.environment = env;
        }
        if let Some(secret) = &cli.team_secret {
            self.api.team_secret = secret.clone();
        }
        if let Some(dir) = &cli.dataset_dir {
            self.run.dataset_dir = dir.clone();
        }
        if let Some(splits) = &cli.data_splits {
            self.run.data_splits = splits.clone();
        }
        if let Some(types) = &cli.problem_types {
            self.run.problem_types = types.clone();
        }
        if let Some(task_id) = &cli.task_id {
            self.run.task_id = Some(task_id.clone());
        }
        if let Some(skips) = &cli.skip_datasets {
            self.run.skip_datasets = skips.clone();
        }
        if let Some(prefix) = &cli.session_name_prefix {
            self.run.session_name_prefix = prefix.clone();
        }
        if let Some(postfix) = &cli.session_name_postfix {
            self.run.session_name_postfix = postfix.clone();
        }
    }

    /// Structural checks. Credentials are checked separately by
    /// [`ApiConfig::ensure_secret`] so offline commands work without
    /// one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "api.timeout_secs".into(),
                message: "must be greater than zero".into(),
            });
        }
        if self.api.retry.backoff_multiplier < 1 {
            return Err(ConfigError::ValidationFailed {
                field: "api.retry.backoff_multiplier".into(),
                message: "must be at least 1".into(),
            });
        }
        if self.run.data_splits.is_empty() {
            return Err(ConfigError::ValidationFailed {
                field: "run.data_splits".into(),
                message: "select at least one data split".into(),
            });
        }
        if self.run.problem_types.is_empty() {
            return Err(ConfigError::ValidationFailed {
                field: "run.problem_types".into(),
                message: "select at least one problem type".into(),
            });
        }
        Ok(())
    }
}
