//! Sliding-window admission control per client identity.
//!
//! Buckets are pruned lazily on each check and never persisted.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::debug;

/// `(max_count, window)` pair. Non-positive values disable limiting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateLimitSpec {
    pub max_count: u32,
    pub window: Duration,
}

impl RateLimitSpec {
    pub const DISABLED: Self = Self {
        max_count: 0,
        window: Duration::ZERO,
    };

    #[must_use]
    pub const fn new(max_count: u32, window_secs: u64) -> Self {
        Self {
            max_count,
            window: Duration::from_secs(window_secs),
        }
    }

    /// Parse `"<count>/<unit>"`. `min` means a 60 second window; any other
    /// unit is one second. Anything unparsable disables limiting.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let Some((count, unit)) = raw.trim().split_once('/') else {
            return Self::DISABLED;
        };
        let Ok(count) = count.trim().parse::<u32>() else {
            return Self::DISABLED;
        };
        let window = if unit.trim() == "min" { 60 } else { 1 };
        Self::new(count, window)
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.max_count > 0 && !self.window.is_zero()
    }
}

impl Default for RateLimitSpec {
    fn default() -> Self {
        Self::DISABLED
    }
}

/// Per-client sliding window limiter.
#[derive(Debug)]
pub struct RateLimiter {
    spec: RateLimitSpec,
    buckets: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl RateLimiter {
    #[must_use]
    pub fn new(spec: RateLimitSpec) -> Self {
        Self {
            spec,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub const fn spec(&self) -> RateLimitSpec {
        self.spec
    }

    /// Admit or deny one request from `client` at the current instant.
    pub fn allow(&self, client: &str) -> bool {
        self.allow_at(client, Instant::now())
    }

    /// Admit or deny one request from `client` at `now`.
    pub fn allow_at(&self, client: &str, now: Instant) -> bool {
        if !self.spec.is_enabled() {
            return true;
        }
        let mut buckets = self
            .buckets
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let bucket = buckets.entry(client.to_string()).or_default();
        while bucket
            .front()
            .is_some_and(|t| now.saturating_duration_since(*t) >= self.spec.window)
        {
            bucket.pop_front();
        }
        if bucket.len() >= self.spec.max_count as usize {
            debug!(target: "romdl.http", client, "rate limit exceeded");
            return false;
        }
        bucket.push_back(now);
        true
    }
}
