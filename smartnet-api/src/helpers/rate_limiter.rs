use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Outcome of counting one attempt against a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed { remaining: u32 },
    Limited { retry_after: Duration },
}

#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Count one attempt for `key` and decide whether it may proceed
    async fn hit(&self, key: &str) -> RateDecision;
}

struct Window {
    started: Instant,
    count: u32,
}

/// Fixed-window counter per key, held in memory.
///
/// State is per process; a restart or a second instance starts from zero.
pub struct FixedWindowLimiter {
    max_attempts: u32,
    window: Duration,
    windows: Arc<Mutex<HashMap<String, Window>>>,
}

impl FixedWindowLimiter {
    pub fn new(max_attempts: u32, window: Duration) -> Self {
        Self {
            max_attempts,
            window,
            windows: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub async fn hit_at(&self, key: &str, now: Instant) -> RateDecision {
        let mut windows = self.windows.lock().await;

        // Drop finished windows so the map does not grow with every address seen
        let window_len = self.window;
        windows.retain(|_, w| now.saturating_duration_since(w.started) < window_len);

        let entry = windows.entry(key.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });

        if entry.count >= self.max_attempts {
            let elapsed = now.saturating_duration_since(entry.started);
            return RateDecision::Limited {
                retry_after: self.window.saturating_sub(elapsed),
            };
        }

        entry.count += 1;
        RateDecision::Allowed {
            remaining: self.max_attempts - entry.count,
        }
    }
}

#[async_trait]
impl RateLimiter for FixedWindowLimiter {
    async fn hit(&self, key: &str) -> RateDecision {
        self.hit_at(key, Instant::now()).await
    }
}
