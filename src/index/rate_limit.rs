use tokio::time::{Duration, Instant, sleep};
use tracing::{Level, event};

const WINDOW: Duration = Duration::from_secs(60);

/// Rolling one-minute call quota for the generative provider.
///
/// Once the quota is spent, `acquire` blocks the pipeline until the window
/// elapses. The pause is intentional backpressure against a quota-limited
/// external model, observable in the logs but never an error.
pub struct RateLimiter {
    quota: u32,
    calls: u32,
    window_start: Instant,
}

impl RateLimiter {
    pub fn new(quota: u32) -> Self {
        Self {
            quota,
            calls: 0,
            window_start: Instant::now(),
        }
    }

    /// Wait for a call slot in the current window, then consume it.
    pub async fn acquire(&mut self) {
        if self.calls >= self.quota {
            let elapsed = self.window_start.elapsed();
            if elapsed < WINDOW {
                let wait = WINDOW - elapsed;
                event!(
                    Level::INFO,
                    "rate limit reached, pausing for {:.1}s",
                    wait.as_secs_f32()
                );
                sleep(wait).await;
            }
            self.calls = 0;
            self.window_start = Instant::now();
        }
        self.calls += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_acquire_within_quota_does_not_wait() {
        let mut limiter = RateLimiter::new(3);
        let begin = Instant::now();
        for _ in 0..3 {
            limiter.acquire().await;
        }
        assert_eq!(Instant::now(), begin);
    }

    #[tokio::test(start_paused = true)]
    async fn test_acquire_over_quota_waits_out_the_window() {
        let mut limiter = RateLimiter::new(2);
        let begin = Instant::now();
        for _ in 0..3 {
            limiter.acquire().await;
        }
        assert!(Instant::now() - begin >= WINDOW);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_window_holds_more_calls_than_the_quota() {
        let quota = 2u32;
        let mut limiter = RateLimiter::new(quota);
        let mut stamps = Vec::new();
        for _ in 0..7 {
            limiter.acquire().await;
            stamps.push(Instant::now());
        }
        for (i, start) in stamps.iter().enumerate() {
            let in_window = stamps[i..]
                .iter()
                .take_while(|stamp| **stamp - *start < WINDOW)
                .count();
            assert!(in_window as u32 <= quota);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_resets_after_the_pause() {
        let mut limiter = RateLimiter::new(1);
        limiter.acquire().await;
        let begin = Instant::now();
        limiter.acquire().await;
        let first_pause = Instant::now() - begin;
        assert!(first_pause >= WINDOW);

        // A fresh window has one slot free again.
        let begin = Instant::now();
        limiter.acquire().await;
        assert!(Instant::now() - begin >= WINDOW);
    }
}
