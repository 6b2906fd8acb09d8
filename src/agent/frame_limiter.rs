//! Animation-frame rate limiter
//!
//! Wraps the page's animation-frame primitive: a callback scheduled sooner
//! than `1000 / target_fps` ms after the last invocation is deferred by a
//! timer for the remaining interval. A simple leaky-bucket limiter with no
//! fairness or priority ordering across callbacks.

use std::time::{Duration, Instant};

/// What to do with a frame callback that just came due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameDecision {
    /// Run it now
    Run,
    /// Defer it by this much, then poll again
    Defer(Duration),
}

#[derive(Debug)]
pub struct FrameLimiter {
    interval: Duration,
    last_run: Option<Instant>,
}

impl FrameLimiter {
    pub fn new(target_fps: u32) -> Self {
        Self {
            interval: interval_for(target_fps),
            last_run: None,
        }
    }

    pub fn set_target_fps(&mut self, target_fps: u32) {
        self.interval = interval_for(target_fps);
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Decide whether a callback may run at `now`. A `Run` decision counts
    /// as the invocation; the caller must re-poll after a `Defer`.
    pub fn poll(&mut self, now: Instant) -> FrameDecision {
        match self.last_run {
            Some(last) if now.duration_since(last) < self.interval => {
                FrameDecision::Defer(self.interval - now.duration_since(last))
            }
            _ => {
                self.last_run = Some(now);
                FrameDecision::Run
            }
        }
    }
}

fn interval_for(target_fps: u32) -> Duration {
    Duration::from_secs_f64(1.0 / f64::from(target_fps.max(1)))
}
