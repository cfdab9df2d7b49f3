use thiserror::Error;

/// Failures raised by the HTTP client.
///
/// Only [`ConnectionFailed`] and [`Timeout`] are worth replaying; the
/// rest describe responses the service actually produced.
///
/// [`ConnectionFailed`]: ApiError::ConnectionFailed
/// [`Timeout`]: ApiError::Timeout
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("connection failed: {reason}")]
    ConnectionFailed { reason: String },

    #[error("request timed out: {reason}")]
    Timeout { reason: String },

    #[error("received an empty response from the service")]
    EmptyResponse,

    #[error("protocol violation: {message}")]
    Protocol { message: String },

    #[error("server rejected request with http {status}: {message}")]
    Server { status: u16, message: String },
}

impl ApiError {
    /// Whether retrying the same request can plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ApiError::ConnectionFailed { .. } | ApiError::Timeout { .. }
        )
    }
}
