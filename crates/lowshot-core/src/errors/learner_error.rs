use thiserror::Error;

/// Failures raised by a learner implementation.
#[derive(Debug, Error)]
pub enum LearnerError {
    /// `fit` was called before the stage was announced.
    #[error("stage must be set before training")]
    StageNotSet,

    #[error("learner failed: {reason}")]
    Failed { reason: String },
}
