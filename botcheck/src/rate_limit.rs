//! Per-conversation spacing of outbound actions.

use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::debug;

/// Enforces a minimum wall-clock gap between two actions. Owned by one conversation; the clock
/// is never shared.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_call: Option<Instant>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: None,
        }
    }

    /// Sleeps for whatever is left of the interval since the previous action, then stamps now.
    pub async fn acquire(&mut self) {
        if let Some(last) = self.last_call {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                debug!(wait_ms = wait.as_millis() as u64, "Rate limit: delaying action");
                sleep(wait).await;
            }
        }
        self.last_call = Some(Instant::now());
    }

    pub fn last_call(&self) -> Option<Instant> {
        self.last_call
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_first_action_is_not_delayed() {
        let mut limiter = RateLimiter::new(Duration::from_secs(1));
        let start = Instant::now();

        limiter.acquire().await;

        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(limiter.last_call(), Some(start));
    }

    #[tokio::test(start_paused = true)]
    async fn test_back_to_back_actions_are_spaced() {
        let mut limiter = RateLimiter::new(Duration::from_secs(1));
        let start = Instant::now();

        limiter.acquire().await;
        limiter.acquire().await;
        limiter.acquire().await;

        assert!(start.elapsed() >= Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_remaining_delta_is_waited() {
        let mut limiter = RateLimiter::new(Duration::from_secs(1));
        limiter.acquire().await;
        sleep(Duration::from_millis(700)).await;

        let before = Instant::now();
        limiter.acquire().await;

        let waited = before.elapsed();
        assert!(waited >= Duration::from_millis(300));
        assert!(waited < Duration::from_millis(400));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_wait_after_long_idle() {
        let mut limiter = RateLimiter::new(Duration::from_secs(1));
        limiter.acquire().await;
        sleep(Duration::from_secs(5)).await;

        let before = Instant::now();
        limiter.acquire().await;

        assert_eq!(before.elapsed(), Duration::ZERO);
    }
}
