//! # lowshot-session
//!
//! Drives one benchmark session end to end: seed label rounds,
//! budget-bounded checkpoints, the base-to-adaptation transition, and
//! the final completion check.

pub mod engine;

pub use engine::{compose_session_name, format_elapsed, SessionReport, SessionRunner};
