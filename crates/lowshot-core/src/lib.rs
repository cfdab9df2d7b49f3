//! # lowshot-core
//!
//! Shared foundation for the lowshot benchmark harness: wire-level
//! models, one error enum per subsystem, layered configuration, and
//! the traits that connect the HTTP client, the session engine, and
//! learner implementations.
//!
//! This crate is dependency-light on purpose. Everything that talks
//! to the network or the filesystem lives in the crates above it.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

pub use errors::{HarnessError, HarnessResult};
