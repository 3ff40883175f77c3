//! Exponential-backoff retry policy for store reads.
//!
//! Each attempt gets a longer request timeout than the one before it, and
//! the pause between attempts grows by [`RetryPolicy::multiplier`] up to
//! [`RetryPolicy::max_delay`]. Writes are never retried here; a failed
//! write is reported to the bulk executor as-is.

use std::future::Future;
use std::time::Duration;

/// Tunable parameters for read retries.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts including the first one.
    pub max_attempts: u32,
    /// Delay before the second attempt.
    pub initial_delay: Duration,
    /// Upper bound on the delay between attempts.
    pub max_delay: Duration,
    /// Factor by which the delay grows after each failure.
    pub multiplier: f64,
    /// Request timeout for the first attempt.
    pub initial_timeout: Duration,
    /// Added to the timeout on every subsequent attempt.
    pub timeout_step: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
            multiplier: 2.0,
            initial_timeout: Duration::from_secs(10),
            timeout_step: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Request timeout for a 1-based attempt number.
    pub fn timeout_for_attempt(&self, attempt: u32) -> Duration {
        self.initial_timeout + self.timeout_step * attempt.saturating_sub(1)
    }
}

/// Calculate the next backoff delay from the current delay and policy.
///
/// The result is clamped to [`RetryPolicy::max_delay`].
pub fn next_delay(current: Duration, policy: &RetryPolicy) -> Duration {
    let next_ms = (current.as_millis() as f64 * policy.multiplier) as u64;
    Duration::from_millis(next_ms).min(policy.max_delay)
}

/// Run `op` until it succeeds, `is_retryable` rejects the error, or the
/// policy runs out of attempts. `op` receives the attempt's timeout.
pub async fn with_retry<T, E, F, Fut>(
    policy: &RetryPolicy,
    operation: &str,
    is_retryable: impl Fn(&E) -> bool,
    mut op: F,
) -> Result<T, E>
where
    E: std::fmt::Display,
    F: FnMut(Duration) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut delay = policy.initial_delay;
    let mut attempt = 1;

    loop {
        match op(policy.timeout_for_attempt(attempt)).await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < max_attempts && is_retryable(&e) => {
                tracing::warn!(
                    operation,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Store read failed, retrying"
                );
                tokio::time::sleep(delay).await;
                delay = next_delay(delay, policy);
                attempt += 1;
            }
            Err(e) => {
                tracing::error!(operation, attempt, error = %e, "Store read failed");
                return Err(e);
            }
        }
    }
}
