//! Retry policy with exponential backoff.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// Default number of attempts, including the first.
const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default delay before the first retry.
const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(300);

/// How many times to try an operation and how long to wait in between.
///
/// The wait before retry `n` (1-based) is `base_delay * 2^(n-1)`, so the
/// defaults wait 0.3s, 0.6s, 1.2s and 2.4s across five attempts.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. At least 1.
    pub max_attempts: u32,

    /// Delay before the first retry.
    pub base_delay: Duration,
}

/// Why a retried operation gave up.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RetryError<E> {
    /// Every attempt failed with a retryable error
    #[error("gave up after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: E },

    /// An attempt failed with an error that retrying cannot fix
    #[error("failed on attempt {attempts}: {error}")]
    Fatal { attempts: u32, error: E },
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Delay before retry number `retry` (1-based).
    pub fn backoff(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(31);
        self.base_delay.saturating_mul(1 << exponent)
    }

    /// Run `op` until it succeeds, fails fatally, or attempts run out.
    ///
    /// `op` receives the 1-based attempt number. Errors for which
    /// `is_retryable` returns false end the loop immediately. The backoff
    /// sleep happens before each retry, never after the last attempt.
    pub async fn run<T, E, F, Fut>(
        &self,
        mut op: F,
        is_retryable: impl Fn(&E) -> bool,
    ) -> Result<T, RetryError<E>>
    where
        E: fmt::Display,
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            let error = match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };

            if !is_retryable(&error) {
                return Err(RetryError::Fatal {
                    attempts: attempt,
                    error,
                });
            }

            if attempt >= max_attempts {
                return Err(RetryError::Exhausted {
                    attempts: attempt,
                    last: error,
                });
            }

            let delay = self.backoff(attempt);
            warn!(attempt, max_attempts, ?delay, %error, "retryable failure, backing off");
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }
}
