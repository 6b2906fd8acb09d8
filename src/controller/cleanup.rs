//! Periodic cleanup cycle
//!
//! The controller runs a repeating timer; each tick dispatches either a
//! light or an aggressive cleanup hint to the agent. Aggressive passes run
//! every `AGGRESSIVE_EVERY` ticks, or on every tick while minimized.

use std::time::Duration;

/// Period of the cleanup timer.
pub const CLEANUP_PERIOD: Duration = Duration::from_secs(10);

/// Light cleanups between aggressive passes while visible.
const AGGRESSIVE_EVERY: u32 = 30;

/// Which cleanup a tick should dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupKind {
    Light,
    Aggressive,
}

/// Cycle counter behind the cleanup timer.
#[derive(Debug, Default)]
pub struct CleanupCycle {
    ticks: u32,
}

impl CleanupCycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one timer tick and decide which cleanup to dispatch.
    pub fn on_tick(&mut self, minimized: bool) -> CleanupKind {
        self.ticks += 1;
        if minimized || self.ticks >= AGGRESSIVE_EVERY {
            self.ticks = 0;
            CleanupKind::Aggressive
        } else {
            CleanupKind::Light
        }
    }

    /// Restart the cycle, as after an out-of-band aggressive pass.
    pub fn reset(&mut self) {
        self.ticks = 0;
    }
}
