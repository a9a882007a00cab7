//! Retry policy helpers.
//!
//! The transport layer never retries on its own; loaders wrap their
//! top-level fetches with [`with_retry`].

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tracing::debug;

use crate::error::ClientError;

/// Retry decision result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Retry after a delay.
    RetryAfter(Duration),
    /// Do not retry.
    DoNotRetry,
}

/// Retry policy configuration.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the initial attempt).
    pub max_attempts: usize,
    /// Base delay for exponential backoff.
    pub base_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Maximum jitter to add to delays.
    pub max_jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
            max_jitter: Duration::from_millis(150),
        }
    }
}

impl RetryPolicy {
    /// Decide whether to retry based on the error and attempt count.
    #[must_use]
    pub fn decide(&self, error: &ClientError, attempt: usize) -> RetryDecision {
        if attempt >= self.max_attempts {
            return RetryDecision::DoNotRetry;
        }
        if !error.is_retryable() {
            return RetryDecision::DoNotRetry;
        }
        // A malformed success response is retried once at most.
        if matches!(error, ClientError::Protocol { .. }) && attempt > 1 {
            return RetryDecision::DoNotRetry;
        }

        let base_ms = u64::try_from(self.base_delay.as_millis()).unwrap_or(u64::MAX);
        let exp =
            2_u64.saturating_pow(u32::try_from(attempt.saturating_sub(1)).unwrap_or(u32::MAX));
        let mut delay_ms = base_ms.saturating_mul(exp);
        let max_ms = u64::try_from(self.max_delay.as_millis()).unwrap_or(u64::MAX);
        if delay_ms > max_ms {
            delay_ms = max_ms;
        }
        let jitter_ms = if self.max_jitter.as_millis() > 0 {
            let mut rng = rand::thread_rng();
            let jitter_max = u64::try_from(self.max_jitter.as_millis()).unwrap_or(u64::MAX);
            rng.gen_range(0..=jitter_max)
        } else {
            0
        };
        RetryDecision::RetryAfter(Duration::from_millis(delay_ms + jitter_ms))
    }
}

/// Drive an operation through the retry policy until it succeeds or
/// the policy gives up.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => match policy.decide(&err, attempt) {
                RetryDecision::RetryAfter(delay) => {
                    debug!(attempt, ?delay, "retrying GraphQL request");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                RetryDecision::DoNotRetry => return Err(err),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::*;

    fn quiet_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(40),
            max_jitter: Duration::ZERO,
        }
    }

    #[test]
    fn timeout_is_retried_with_backoff() {
        let policy = quiet_policy();
        let err = ClientError::Timeout {
            timeout: Duration::from_secs(30),
        };
        assert_eq!(
            policy.decide(&err, 1),
            RetryDecision::RetryAfter(Duration::from_millis(10))
        );
        assert_eq!(
            policy.decide(&err, 2),
            RetryDecision::RetryAfter(Duration::from_millis(20))
        );
        assert_eq!(policy.decide(&err, 3), RetryDecision::DoNotRetry);
    }

    #[test]
    fn graphql_errors_are_never_retried() {
        let policy = quiet_policy();
        let err = ClientError::Graphql {
            messages: "bad field".to_string(),
        };
        assert_eq!(policy.decide(&err, 1), RetryDecision::DoNotRetry);
    }

    #[test]
    fn client_http_errors_are_not_retried() {
        let policy = quiet_policy();
        let err = ClientError::Http {
            status: StatusCode::NOT_FOUND,
            status_text: "Not Found".to_string(),
        };
        assert_eq!(policy.decide(&err, 1), RetryDecision::DoNotRetry);
    }

    #[test]
    fn server_http_errors_are_retried() {
        let policy = quiet_policy();
        let err = ClientError::Http {
            status: StatusCode::SERVICE_UNAVAILABLE,
            status_text: "Service Unavailable".to_string(),
        };
        assert!(matches!(
            policy.decide(&err, 1),
            RetryDecision::RetryAfter(_)
        ));
    }

    #[test]
    fn protocol_errors_retry_once() {
        let policy = quiet_policy();
        let err = ClientError::Protocol {
            message: "no data returned".to_string(),
        };
        assert!(matches!(
            policy.decide(&err, 1),
            RetryDecision::RetryAfter(_)
        ));
        assert_eq!(policy.decide(&err, 2), RetryDecision::DoNotRetry);
    }
}
