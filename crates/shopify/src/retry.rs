//! Throttle-aware retry wrapper for Admin API calls.
//!
//! Every remote call goes through [`call_with_retry`]. A failure that
//! classifies as throttled is retried after the server-suggested wait
//! (or the policy default), capped at `max_backoff`, at most `max_retries`
//! times. Any other failure is returned immediately.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tracing::{error, warn};

/// Classification of a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrySignal {
    /// Rate limited; `retry_after` is the server's suggested wait, if any.
    Throttled {
        /// Suggested wait before re-issuing the call.
        retry_after: Option<Duration>,
    },
    /// Anything else. Terminal for the call.
    Fatal,
}

/// Errors that can tell the retry wrapper whether they are throttling signals.
pub trait Classify {
    /// Classify this error for the retry wrapper.
    fn retry_signal(&self) -> RetrySignal;
}

/// Bounded retry policy for throttled calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of re-issues after the first attempt.
    pub max_retries: u32,
    /// Wait used when the server suggests none.
    pub default_backoff: Duration,
    /// Upper bound on any single wait.
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 10,
            default_backoff: Duration::from_secs(4),
            max_backoff: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Wait to apply for a throttling event.
    #[must_use]
    pub fn delay_for(&self, suggested: Option<Duration>) -> Duration {
        suggested
            .unwrap_or(self.default_backoff)
            .min(self.max_backoff)
    }
}

/// Failure returned by [`call_with_retry`].
#[derive(Debug, Error)]
pub enum RetryError<E> {
    /// The call failed with a non-throttling error.
    #[error(transparent)]
    Failed(E),

    /// The call was still throttled after the last permitted retry.
    #[error("retries exhausted after {attempts} attempts: {last}")]
    Exhausted {
        /// Total attempts made, including the first.
        attempts: u32,
        /// The final throttling error.
        last: E,
    },
}

/// Run `call`, re-issuing it while it fails with a throttling signal.
///
/// `operation` names the call in log events.
///
/// # Errors
///
/// Returns `RetryError::Failed` for the first non-throttling error and
/// `RetryError::Exhausted` once `policy.max_retries` retries were spent.
pub async fn call_with_retry<T, E, F, Fut>(
    policy: &RetryPolicy,
    operation: &str,
    mut call: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Classify + std::fmt::Display,
{
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;

        let err = match call().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        let RetrySignal::Throttled { retry_after } = err.retry_signal() else {
            error!(operation, attempt, error = %err, "Admin API call failed");
            return Err(RetryError::Failed(err));
        };

        if attempt > policy.max_retries {
            error!(operation, attempts = attempt, "Still throttled, giving up");
            return Err(RetryError::Exhausted {
                attempts: attempt,
                last: err,
            });
        }

        let delay = policy.delay_for(retry_after);
        warn!(
            operation,
            attempt,
            suggested = ?retry_after,
            wait = ?delay,
            "Rate limited, waiting before retrying"
        );
        tokio::time::sleep(delay).await;
    }
}
