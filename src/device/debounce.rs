//! Cancellable coalescing timer
//!
//! Deadline-based rather than callback-based: the owner calls `poll` from
//! its regular tick and reacts when the quiet period has elapsed. Each
//! `schedule` replaces any pending deadline, so a burst of events
//! collapses into a single firing (coalescing, not just delaying).

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct DebounceTimer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl DebounceTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Arm (or re-arm) the timer. A pending deadline is cancelled first.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Drop any pending deadline without firing.
    pub fn cancel_pending(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns true exactly once per elapsed schedule.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}
