//! Bounded exponential backoff for transient transport failures.

use std::fmt;
use std::time::Duration;

use lowshot_core::config::defaults;
use lowshot_core::config::RetryConfig;

/// Retry schedule. The delay doubles (or whatever the multiplier
/// says) after every failed attempt, capped at `max_delay`.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries after the initial attempt.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    pub backoff_multiplier: u32,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: defaults::DEFAULT_MAX_RETRIES,
            initial_delay: Duration::from_secs(defaults::DEFAULT_INITIAL_DELAY_SECS),
            backoff_multiplier: defaults::DEFAULT_BACKOFF_MULTIPLIER,
            max_delay: Duration::from_secs(defaults::DEFAULT_MAX_DELAY_SECS),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            initial_delay: Duration::from_secs(config.initial_delay_secs),
            backoff_multiplier: config.backoff_multiplier,
            max_delay: Duration::from_secs(config.max_delay_secs),
        }
    }

    /// Delay before retry `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = self
            .backoff_multiplier
            .saturating_pow(attempt.saturating_sub(1));
        self.initial_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }
}

/// Run `op`, retrying errors that `is_transient` accepts until the
/// policy is exhausted. The last error is returned unchanged.
pub fn retry_with_backoff<T, E, F>(
    policy: &RetryPolicy,
    is_transient: impl Fn(&E) -> bool,
    mut op: F,
) -> Result<T, E>
where
    F: FnMut() -> Result<T, E>,
    E: fmt::Display,
{
    let mut attempt = 0;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(err) if attempt < policy.max_retries && is_transient(&err) => {
                attempt += 1;
                let delay = policy.delay_for(attempt);
                tracing::warn!(
                    "api: attempt failed ({err}), retry {attempt}/{} in {delay:?}",
                    policy.max_retries
                );
                std::thread::sleep(delay);
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lowshot_core::errors::ApiError;
    use proptest::prelude::*;

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            initial_delay: Duration::from_millis(1),
            backoff_multiplier: 2,
            max_delay: Duration::from_millis(4),
        }
    }

    #[test]
    fn success_on_first_attempt() {
        let mut calls = 0;
        let result: Result<u32, ApiError> =
            retry_with_backoff(&fast_policy(3), ApiError::is_transient, || {
                calls += 1;
                Ok(7)
            });
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls, 1);
    }

    #[test]
    fn transient_failures_retry_until_success() {
        let mut calls = 0;
        let result: Result<&str, ApiError> =
            retry_with_backoff(&fast_policy(3), ApiError::is_transient, || {
                calls += 1;
                if calls < 3 {
                    Err(ApiError::ConnectionFailed {
                        reason: "refused".into(),
                    })
                } else {
                    Ok("done")
                }
            });
        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls, 3);
    }

    #[test]
    fn exhaustion_returns_the_last_error_unchanged() {
        let mut calls = 0;
        let result: Result<(), ApiError> =
            retry_with_backoff(&fast_policy(3), ApiError::is_transient, || {
                calls += 1;
                Err(ApiError::Timeout {
                    reason: format!("read timed out on call {calls}"),
                })
            });
        assert_eq!(calls, 4);
        match result {
            Err(ApiError::Timeout { reason }) => {
                assert_eq!(reason, "read timed out on call 4");
            }
            other => panic!("expected the final Timeout, got {other:?}"),
        }
    }

    #[test]
    fn non_transient_errors_fail_immediately() {
        let mut calls = 0;
        let result: Result<(), ApiError> =
            retry_with_backoff(&fast_policy(3), ApiError::is_transient, || {
                calls += 1;
                Err(ApiError::Protocol {
                    message: "missing `tasks`".into(),
                })
            });
        assert_eq!(calls, 1);
        assert!(matches!(result, Err(ApiError::Protocol { .. })));
    }

    #[test]
    fn default_schedule_doubles_from_three_seconds() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.delay_for(1), Duration::from_secs(3));
        assert_eq!(policy.delay_for(2), Duration::from_secs(6));
        assert_eq!(policy.delay_for(3), Duration::from_secs(12));
    }

    #[test]
    fn delay_is_capped() {
        let policy = RetryPolicy {
            max_retries: 10,
            initial_delay: Duration::from_secs(3),
            backoff_multiplier: 2,
            max_delay: Duration::from_secs(60),
        };
        assert_eq!(policy.delay_for(6), Duration::from_secs(60));
        assert_eq!(policy.delay_for(30), Duration::from_secs(60));
    }

    proptest! {
        #[test]
        fn delay_never_exceeds_the_cap(
            retries in 1u32..16,
            init_ms in 1u64..5_000,
            mult in 1u32..5,
        ) {
            let policy = RetryPolicy {
                max_retries: retries,
                initial_delay: Duration::from_millis(init_ms),
                backoff_multiplier: mult,
                max_delay: Duration::from_millis(30_000),
            };
            for attempt in 1..=retries {
                prop_assert!(policy.delay_for(attempt) <= policy.max_delay);
            }
        }

        #[test]
        fn delays_never_shrink(attempt in 1u32..12) {
            let policy = RetryPolicy::default();
            prop_assert!(policy.delay_for(attempt + 1) >= policy.delay_for(attempt));
        }
    }
}
