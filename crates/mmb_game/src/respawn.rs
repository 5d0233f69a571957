use std::time::{Duration, Instant};

/// One-shot delayed enemy respawn, checked once per tick against a
/// monotonic clock. At most one deadline is pending at a time.
#[derive(Debug, Clone, Default)]
pub struct RespawnTimer {
    deadline: Option<Instant>,
}

impl RespawnTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a respawn `delay` after `now`. Returns false and leaves the
    /// existing deadline alone if one is already pending.
    pub fn arm(&mut self, now: Instant, delay: Duration) -> bool {
        if self.deadline.is_some() {
            return false;
        }
        self.deadline = Some(now + delay);
        true
    }

    /// True exactly once, on the first poll at or after the deadline.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn clear(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }
}
