//! Retry utilities with exponential backoff.
//!
//! The transport retries idempotent lookups only. Calls that create or change
//! remote state are issued once.

use std::time::Duration;
use tokio::time::sleep;

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first
    pub max_attempts: u32,

    /// Initial delay before the first retry
    pub initial_delay: Duration,

    /// Maximum delay between retries
    pub max_delay: Duration,

    /// Base for exponential backoff (typically 2.0)
    pub exponential_base: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(10),
            exponential_base: 2.0,
        }
    }
}

impl RetryConfig {
    /// Create a configuration that never retries.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            exponential_base: 1.0,
        }
    }

    /// Delay to wait after the given failed attempt (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1) as i32;
        let secs = self.initial_delay.as_secs_f64() * self.exponential_base.powi(exponent);
        Duration::from_secs_f64(secs.min(self.max_delay.as_secs_f64()))
    }
}

/// Run `f` until it succeeds, fails with an error `is_retryable` rejects, or
/// `max_attempts` is reached. The last error is returned unchanged.
///
/// ```rust,no_run
/// use s1_client::retry::{with_retry_if, RetryConfig};
///
/// async fn lookup() -> Result<u32, String> {
///     with_retry_if(
///         &RetryConfig::default(),
///         || async { Err("connection reset".to_string()) },
///         |err| err.contains("reset"),
///     )
///     .await
/// }
/// ```
pub async fn with_retry_if<F, Fut, T, E, P>(
    config: &RetryConfig,
    mut f: F,
    mut is_retryable: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    P: FnMut(&E) -> bool,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        let err = match f().await {
            Ok(value) => {
                if attempt > 1 {
                    tracing::debug!(attempt, "request succeeded after retry");
                }
                return Ok(value);
            }
            Err(err) => err,
        };

        if !is_retryable(&err) {
            return Err(err);
        }
        if attempt >= max_attempts {
            if max_attempts > 1 {
                tracing::error!(attempts = attempt, error = %err, "giving up on request");
            }
            return Err(err);
        }

        let delay = config.backoff(attempt);
        tracing::warn!(
            attempt,
            max_attempts,
            delay_ms = delay.as_millis() as u64,
            error = %err,
            "request failed, retrying"
        );
        sleep(delay).await;
        attempt += 1;
    }
}
