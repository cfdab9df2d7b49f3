use thiserror::Error;

use crate::errors::{ApiError, ConfigError, LearnerError, SessionError};

/// Top-level error for the CLI and the workflow.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("api error: {0}")]
    Api(#[from] ApiError),

    #[error("session error: {0}")]
    Session(#[from] SessionError),

    #[error("learner error: {0}")]
    Learner(#[from] LearnerError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

pub type HarnessResult<T> = Result<T, HarnessError>;
