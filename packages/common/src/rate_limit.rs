//! Fixed-window request counter keyed by caller.
//!
//! State is process-local: it is lost on restart and not shared between
//! instances.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::info;

/// Outcome of a rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    /// The request fits in the caller's current window.
    Allowed { remaining: u32 },
    /// The window is exhausted. Contains the time until it resets.
    Limited { retry_after: Duration },
}

impl RateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }
}

/// Counter state for a single caller.
#[derive(Debug, Clone, Copy)]
struct Window {
    started_at: Instant,
    count: u32,
}

/// Tracks request counts per caller key within a fixed window.
#[derive(Debug)]
pub struct RateLimiter {
    /// Map of caller key -> current window
    windows: DashMap<String, Window>,
    /// Accepted requests per window.
    max_requests: u32,
    window: Duration,
}

impl RateLimiter {
    /// Create a limiter allowing `max_requests` per `window`.
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            windows: DashMap::new(),
            max_requests,
            window,
        }
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Report whether `key` could be admitted now, without counting a request.
    pub fn check(&self, key: &str) -> RateDecision {
        self.check_at(key, Instant::now())
    }

    pub fn check_at(&self, key: &str, now: Instant) -> RateDecision {
        match self.windows.get(key) {
            Some(window) if !self.expired(&window, now) => self.decide(&window, now),
            _ => RateDecision::Allowed {
                remaining: self.max_requests,
            },
        }
    }

    /// Count a request for `key` if the window allows it.
    ///
    /// A window starts at the first counted request and resets once `window`
    /// has elapsed since its start.
    pub fn acquire(&self, key: &str) -> RateDecision {
        self.acquire_at(key, Instant::now())
    }

    pub fn acquire_at(&self, key: &str, now: Instant) -> RateDecision {
        if self.max_requests == 0 {
            return RateDecision::Limited {
                retry_after: self.window,
            };
        }

        let mut entry = self.windows.entry(key.to_string()).or_insert(Window {
            started_at: now,
            count: 0,
        });

        if self.expired(&entry, now) {
            *entry = Window {
                started_at: now,
                count: 0,
            };
        }

        match self.decide(&entry, now) {
            RateDecision::Allowed { remaining } => {
                entry.count += 1;
                RateDecision::Allowed {
                    remaining: remaining - 1,
                }
            }
            limited => limited,
        }
    }

    /// Forget the window for `key`.
    pub fn clear(&self, key: &str) {
        self.windows.remove(key);
    }

    /// Remove windows that have already elapsed. Returns the number removed.
    pub fn cleanup_stale(&self) -> usize {
        self.cleanup_stale_at(Instant::now())
    }

    pub fn cleanup_stale_at(&self, now: Instant) -> usize {
        let before = self.windows.len();
        self.windows.retain(|_, window| !self.expired(window, now));
        before - self.windows.len()
    }

    /// Get the number of callers currently being tracked.
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    fn expired(&self, window: &Window, now: Instant) -> bool {
        now.saturating_duration_since(window.started_at) >= self.window
    }

    fn decide(&self, window: &Window, now: Instant) -> RateDecision {
        if window.count >= self.max_requests {
            let elapsed = now.saturating_duration_since(window.started_at);
            RateDecision::Limited {
                retry_after: self.window.saturating_sub(elapsed),
            }
        } else {
            RateDecision::Allowed {
                remaining: self.max_requests - window.count,
            }
        }
    }
}

/// Spawn a background task that periodically evicts elapsed windows.
pub fn spawn_cleanup_task(
    limiter: Arc<RateLimiter>,
    cleanup_interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(cleanup_interval);

        loop {
            interval.tick().await;
            let removed = limiter.cleanup_stale();
            if removed > 0 {
                info!(removed, "Cleaned up stale rate limit windows");
            }
        }
    })
}
