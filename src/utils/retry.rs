//! Retry utilities for resilient operations
//!
//! Backoff is linear: the delay before retry `n` is `n * backoff_step`,
//! so the default policy sleeps 2s then 4s between its three attempts.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration for retry behavior
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total number of attempts, the first one included
    pub max_attempts: u32,

    /// Delay added per retry
    pub backoff_step: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_step: Duration::from_secs(2),
        }
    }
}

impl RetryConfig {
    /// Create a new retry configuration with custom attempt count
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Default::default()
        }
    }

    /// Create a retry configuration with a custom backoff step
    pub fn with_step(max_attempts: u32, backoff_step: Duration) -> Self {
        Self {
            max_attempts,
            backoff_step,
        }
    }

    /// Delay slept before the given retry (1-based)
    pub fn calculate_delay(&self, retry: u32) -> Duration {
        self.backoff_step * retry
    }
}

/// Why a retried operation gave up
#[derive(Debug)]
pub enum RetryError<E> {
    /// Every attempt failed with a retryable error
    Exhausted { attempts: u32, last: E },

    /// An attempt failed with an error the predicate refused to retry
    Aborted(E),
}

/// Execute an operation with linear backoff, retrying only errors accepted by `should_retry`
///
/// `operation` receives the 1-based attempt number. `before_retry` runs after a
/// retryable failure and before the backoff sleep, which lets callers swap
/// whatever state the failed attempt used.
///
/// # Example
///
/// ```no_run
/// use kitis::utils::retry::{with_retry_if, RetryConfig};
///
/// # async fn run() {
/// let config = RetryConfig::default();
/// let result = with_retry_if(
///     &config,
///     |_attempt| async { Ok::<_, String>("data") },
///     |e: &String| e.contains("timeout"),
///     |_retry| async {},
/// )
/// .await;
/// # }
/// ```
pub async fn with_retry_if<T, E, F, Fut, P, B, BFut>(
    config: &RetryConfig,
    mut operation: F,
    should_retry: P,
    mut before_retry: B,
) -> Result<T, RetryError<E>>
where
    E: Display,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    B: FnMut(u32) -> BFut,
    BFut: Future<Output = ()>,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation(attempt).await {
            Ok(result) => {
                if attempt > 1 {
                    debug!(attempt = attempt, "Operation succeeded after retry");
                }
                return Ok(result);
            }
            Err(e) if !should_retry(&e) => {
                warn!(attempt = attempt, error = %e, "Non-retryable error encountered");
                return Err(RetryError::Aborted(e));
            }
            Err(e) => {
                if attempt >= max_attempts {
                    warn!(attempts = attempt, error = %e, "All retry attempts failed");
                    return Err(RetryError::Exhausted {
                        attempts: attempt,
                        last: e,
                    });
                }

                let delay = config.calculate_delay(attempt);
                warn!(
                    attempt = attempt,
                    max_attempts = max_attempts,
                    delay_secs = delay.as_secs_f64(),
                    error = %e,
                    "Operation failed, will retry"
                );
                before_retry(attempt).await;
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
