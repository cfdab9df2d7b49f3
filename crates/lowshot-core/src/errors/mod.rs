//! Error taxonomy for the harness.
//!
//! One enum per subsystem, each built with `thiserror`, aggregated
//! into [`HarnessError`] at the binary boundary. Variants carry enough
//! context to be actionable straight from a log line.

mod api_error;
mod config_error;
mod harness_error;
mod learner_error;
mod session_error;

pub use api_error::ApiError;
pub use config_error::ConfigError;
pub use harness_error::{HarnessError, HarnessResult};
pub use learner_error::LearnerError;
pub use session_error::SessionError;
