//! Sliding-window rate limiting for remote calls.
//!
//! The budget is N calls per fixed window. A caller that would exceed it is
//! put to sleep until the oldest call in the window ages out — the call is
//! delayed, never dropped and never failed. This is the mirror's only
//! built-in backpressure mechanism.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Call budget: at most `calls` per `window`.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    /// Calls allowed per window.
    pub calls: usize,
    /// Window length.
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            calls: 10,
            window: Duration::from_secs(60),
        }
    }
}

/// Sliding-window limiter shared by all calls of one client.
pub struct RateLimiter {
    config: RateLimitConfig,
    // Issue times of the calls still inside the window, oldest first.
    window: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    /// Create a limiter with the given budget.
    #[must_use]
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            window: Mutex::new(VecDeque::with_capacity(config.calls)),
        }
    }

    /// Wait until a call slot is available, then consume it.
    ///
    /// Returns immediately while the budget lasts; otherwise sleeps until the
    /// oldest recorded call leaves the window and re-checks.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut window = self.window.lock().await;
                let now = Instant::now();
                while window
                    .front()
                    .is_some_and(|issued| now.duration_since(*issued) >= self.config.window)
                {
                    let _ = window.pop_front();
                }
                if window.len() < self.config.calls {
                    window.push_back(now);
                    return;
                }
                match window.front().copied() {
                    Some(oldest) => self
                        .config
                        .window
                        .saturating_sub(now.duration_since(oldest)),
                    None => Duration::ZERO,
                }
            };
            if !wait.is_zero() {
                debug!(wait_ms = wait.as_millis() as u64, "rate limit reached, waiting for budget");
                tokio::time::sleep(wait).await;
            }
        }
    }
}
