//! # lowshot-client
//!
//! Blocking HTTP transport for the benchmark service. Every request
//! carries the team secret; session-scoped requests add the session
//! token. Requests that are safe to replay go through bounded
//! exponential backoff.

pub mod api;
pub mod retry;

mod response;

pub use api::ApiClient;
pub use retry::{retry_with_backoff, RetryPolicy};
