use thiserror::Error;

use crate::errors::{ApiError, LearnerError};
use crate::models::{ActiveState, Stage};

/// Failures that end a session run.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("api: {0}")]
    Api(#[from] ApiError),

    #[error("learner: {0}")]
    Learner(#[from] LearnerError),

    /// Both stages finished but the service never marked the session
    /// complete.
    #[error("session ended in state {state} instead of Complete")]
    Incomplete { state: ActiveState },

    /// The final base checkpoint did not move the session to the
    /// adaptation stage.
    #[error("server still reports stage {reported} after base checkpoint {checkpoint}")]
    StageTransition { checkpoint: usize, reported: Stage },
}
