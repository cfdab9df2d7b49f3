use thiserror::Error;

/// Failures raised while resolving or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    #[error("failed to parse {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("invalid value for {field}: {message}")]
    ValidationFailed { field: String, message: String },

    #[error("dataset directory does not exist: {path}")]
    DatasetDirMissing { path: String },

    #[error("dataset directory {path} has no `{subdir}` subdirectory")]
    DatasetLayoutInvalid { path: String, subdir: String },
}
