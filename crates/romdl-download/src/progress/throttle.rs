//! Progress throttling.
//!
//! Rate-limits History writes so a fast transfer does not rewrite the whole
//! History file for every received chunk.

use std::time::{Duration, Instant};

/// Minimum spacing between progress writes.
pub struct ProgressThrottle {
    last_emit: Option<Instant>,
    min_interval: Duration,
}

impl ProgressThrottle {
    pub const fn new(min_interval: Duration) -> Self {
        Self {
            last_emit: None,
            min_interval,
        }
    }

    /// Throttle with a default interval of 500ms, matching the streamer cadence.
    pub const fn default_interval() -> Self {
        Self::new(Duration::from_millis(500))
    }

    /// Check if enough time has passed to emit another progress update.
    pub fn should_emit(&mut self) -> bool {
        self.should_emit_at(Instant::now())
    }

    pub fn should_emit_at(&mut self, now: Instant) -> bool {
        match self.last_emit {
            Some(last) if now.duration_since(last) < self.min_interval => false,
            _ => {
                self.last_emit = Some(now);
                true
            }
        }
    }
}

impl Default for ProgressThrottle {
    fn default() -> Self {
        Self::default_interval()
    }
}
