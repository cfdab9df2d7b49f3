//! Layered configuration.
//!
//! Resolution order, weakest first: compiled defaults, an optional
//! `lowshot.toml`, `LOWSHOT_*` environment variables, CLI flags.

pub mod defaults;

mod api_config;
mod harness_config;
mod run_config;

pub use api_config::{ApiConfig, Environment, RetryConfig};
pub use harness_config::{CliOverrides, HarnessConfig, PROJECT_CONFIG_FILE};
pub use run_config::RunConfig;
