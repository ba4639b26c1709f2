//! Fixed-window login rate limiter.
//!
//! One counting window per client key; the window resets entirely when it
//! expires. State lives in a process-wide map and decays via a periodic
//! sweep, so memory stays bounded even under key churn.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::config;

/// Key used when no client identifier is available. All anonymous clients
/// share this single bucket.
pub const FALLBACK_CLIENT_KEY: &str = "unknown";

/// Fixed response body message for rejected login attempts.
pub const RATE_LIMIT_MESSAGE: &str =
    "Terlalu banyak percobaan login. Coba lagi dalam 1 menit.";

#[derive(Debug)]
struct RateLimitEntry {
    count: u32,
    reset_at: Instant,
}

/// Per-client login attempt counter.
///
/// `check` never fails: lock poisoning is recovered from, and unknown clients
/// fall back to [`FALLBACK_CLIENT_KEY`] at the call site.
#[derive(Debug, Clone)]
pub struct LoginRateLimiter {
    entries: Arc<Mutex<HashMap<String, RateLimitEntry>>>,
    max_attempts: u32,
    window: Duration,
}

impl LoginRateLimiter {
    pub fn new() -> Self {
        let cfg = &config::config().rate_limit;
        Self::with_limits(cfg.max_attempts, Duration::from_secs(cfg.window_secs))
    }

    pub fn with_limits(max_attempts: u32, window: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            max_attempts,
            window,
        }
    }

    /// Record an attempt for `key` and report whether it is allowed.
    ///
    /// The first attempt in a window (or after the previous window expired)
    /// resets the counter to 1. Attempts past `max_attempts` within a window
    /// are rejected until the window rolls over.
    pub fn check(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let entry = entries.entry(key.to_string()).or_insert(RateLimitEntry {
            count: 0,
            reset_at: now + self.window,
        });

        if now >= entry.reset_at {
            entry.count = 0;
            entry.reset_at = now + self.window;
        }

        entry.count += 1;
        entry.count <= self.max_attempts
    }

    /// Drop every entry whose window has passed.
    pub fn sweep(&self) {
        let now = Instant::now();
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        entries.retain(|_, entry| entry.reset_at > now);
    }

    /// Number of live (possibly expired, not yet swept) entries.
    pub fn tracked_keys(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Spawn the background sweep task. Runs for the lifetime of the process.
    pub fn spawn_sweeper(&self) -> tokio::task::JoinHandle<()> {
        let limiter = self.clone();
        let interval = Duration::from_secs(config::config().rate_limit.sweep_interval_secs);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick fires immediately; skip it so startup stays quiet.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                limiter.sweep();
                tracing::debug!(tracked = limiter.tracked_keys(), "rate limiter sweep done");
            }
        })
    }
}

impl Default for LoginRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_up_to_max_attempts_then_rejects() {
        let limiter = LoginRateLimiter::with_limits(5, Duration::from_secs(60));
        for attempt in 1..=5 {
            assert!(limiter.check("10.0.0.1"), "attempt {} should pass", attempt);
        }
        assert!(!limiter.check("10.0.0.1"), "6th attempt should be rejected");
        assert!(!limiter.check("10.0.0.1"), "rejection persists within window");
    }

    #[test]
    fn keys_are_counted_independently() {
        let limiter = LoginRateLimiter::with_limits(2, Duration::from_secs(60));
        assert!(limiter.check("a"));
        assert!(limiter.check("a"));
        assert!(!limiter.check("a"));
        assert!(limiter.check("b"));
    }

    #[tokio::test]
    async fn window_expiry_resets_the_counter() {
        let limiter = LoginRateLimiter::with_limits(1, Duration::from_millis(40));
        assert!(limiter.check("c"));
        assert!(!limiter.check("c"));

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(limiter.check("c"), "fresh window starts at count 1");
    }

    #[tokio::test]
    async fn sweep_drops_only_expired_entries() {
        let limiter = LoginRateLimiter::with_limits(5, Duration::from_millis(40));
        limiter.check("old");
        tokio::time::sleep(Duration::from_millis(60)).await;
        limiter.check("fresh");

        limiter.sweep();
        assert_eq!(limiter.tracked_keys(), 1);
    }
}
