//! Fixed-window rate limiter for outbound API calls.
//!
//! Up to `max_calls` calls are admitted back-to-back; the next call waits
//! until the window that started with the first call has elapsed, then a
//! new window begins. Calls clustered at the end of one window and the
//! start of the next can therefore reach twice the limit within one
//! window's duration.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Error constructing a rate limiter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RateLimiterError {
    /// Zero calls per window or a zero-length window
    #[error("rate limiter misconfigured: {0}")]
    Misconfigured(&'static str),
}

/// Calls made in the current window.
#[derive(Debug)]
struct RateBudget {
    call_count: u32,
    window_start: Instant,
}

impl RateBudget {
    fn restart(&mut self, now: Instant) {
        self.call_count = 0;
        self.window_start = now;
    }
}

/// Bounds the call rate to one external endpoint.
///
/// Safe to share between tasks: the budget is updated under a lock that is
/// held across the pause, so concurrent callers queue behind each other
/// rather than racing past the limit.
#[derive(Debug)]
pub struct RateLimiter {
    max_calls: u32,
    window: Duration,
    budget: Mutex<RateBudget>,
}

impl RateLimiter {
    /// Create a limiter admitting `max_calls` per `window`.
    pub fn new(max_calls: u32, window: Duration) -> Result<Self, RateLimiterError> {
        if max_calls == 0 {
            return Err(RateLimiterError::Misconfigured(
                "max calls per window must be positive",
            ));
        }
        if window.is_zero() {
            return Err(RateLimiterError::Misconfigured(
                "window duration must be positive",
            ));
        }

        Ok(Self {
            max_calls,
            window,
            budget: Mutex::new(RateBudget {
                call_count: 0,
                window_start: Instant::now(),
            }),
        })
    }

    /// Create a limiter admitting `max_calls` per minute.
    pub fn per_minute(max_calls: u32) -> Result<Self, RateLimiterError> {
        Self::new(max_calls, Duration::from_secs(60))
    }

    /// Wait until one more call is allowed, then record it.
    ///
    /// Never fails; at worst sleeps for one window. Dropping the future
    /// while it sleeps leaves the budget untouched.
    pub async fn acquire(&self) {
        let mut budget = self.budget.lock().await;
        let now = Instant::now();

        if budget.call_count == 0 || now.duration_since(budget.window_start) >= self.window {
            budget.restart(now);
        }

        if budget.call_count >= self.max_calls {
            let remaining = self
                .window
                .saturating_sub(now.duration_since(budget.window_start));
            debug!(
                max_calls = self.max_calls,
                ?remaining,
                "rate limit reached, pausing"
            );
            tokio::time::sleep(remaining).await;
            budget.restart(Instant::now());
        }

        budget.call_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    const MINUTE: Duration = Duration::from_secs(60);

    #[test]
    fn rejects_zero_calls() {
        assert_eq!(
            RateLimiter::new(0, MINUTE).unwrap_err(),
            RateLimiterError::Misconfigured("max calls per window must be positive")
        );
    }

    #[test]
    fn rejects_zero_window() {
        assert!(RateLimiter::new(5, Duration::ZERO).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn burst_up_to_limit_is_not_delayed() {
        let limiter = RateLimiter::new(3, MINUTE).unwrap();
        let start = Instant::now();

        for _ in 0..3 {
            limiter.acquire().await;
        }

        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn call_past_limit_waits_for_window() {
        let limiter = RateLimiter::new(2, MINUTE).unwrap();
        let start = Instant::now();

        limiter.acquire().await;
        tokio::time::advance(Duration::from_secs(10)).await;
        limiter.acquire().await;

        let before_third = Instant::now();
        limiter.acquire().await;

        // Window began with the first call, 10s before the second.
        assert_eq!(before_third.elapsed(), Duration::from_secs(50));
        assert_eq!(start.elapsed(), MINUTE);
    }

    #[tokio::test(start_paused = true)]
    async fn window_restarts_after_pause() {
        let limiter = RateLimiter::new(2, MINUTE).unwrap();
        let start = Instant::now();

        // 1, 2 at t=0; 3 pauses to t=60 and opens a window; 4 fits in it;
        // 5 pauses to t=120.
        for _ in 0..4 {
            limiter.acquire().await;
        }
        assert_eq!(start.elapsed(), MINUTE);

        limiter.acquire().await;
        assert_eq!(start.elapsed(), 2 * MINUTE);
    }

    #[tokio::test(start_paused = true)]
    async fn expired_window_needs_no_pause() {
        let limiter = RateLimiter::new(2, MINUTE).unwrap();

        limiter.acquire().await;
        limiter.acquire().await;
        tokio::time::advance(Duration::from_secs(61)).await;

        let before = Instant::now();
        limiter.acquire().await;
        limiter.acquire().await;
        assert_eq!(before.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_wait_leaves_window_unchanged() {
        let limiter = RateLimiter::new(1, MINUTE).unwrap();
        let start = Instant::now();

        limiter.acquire().await;

        // Give up 10s into the pause.
        let cancelled = tokio::time::timeout(Duration::from_secs(10), limiter.acquire()).await;
        assert!(cancelled.is_err());

        // The next call waits only for the original window to end.
        let before = Instant::now();
        limiter.acquire().await;
        assert_eq!(before.elapsed(), Duration::from_secs(50));
        assert_eq!(start.elapsed(), MINUTE);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_share_budget() {
        let limiter = Arc::new(RateLimiter::new(2, MINUTE).unwrap());
        let start = Instant::now();

        let tasks: Vec<_> = (0..6)
            .map(|_| {
                let limiter = limiter.clone();
                tokio::spawn(async move {
                    limiter.acquire().await;
                    Instant::now()
                })
            })
            .collect();

        let mut admitted = Vec::new();
        for task in tasks {
            admitted.push(task.await.unwrap().duration_since(start));
        }
        admitted.sort();

        // Never more than two calls per window.
        assert_eq!(
            admitted,
            vec![
                Duration::ZERO,
                Duration::ZERO,
                MINUTE,
                MINUTE,
                2 * MINUTE,
                2 * MINUTE,
            ]
        );
    }
}
