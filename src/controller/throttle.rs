//! Background CPU throttle ticker
//!
//! While the window is blurred or minimized, a fine-grained timer emits one
//! smooth `CpuThrottle` message per elapsed second. The short tick keeps the
//! throttle responsive to cancellation without flooding the channel.

use crate::ipc::{ControllerMessage, ThrottleLevel};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};

const TICK: Duration = Duration::from_millis(100);
const EMIT_EVERY: Duration = Duration::from_secs(1);

/// Owns the throttle task. Enabling replaces any previous ticker; disabling
/// (or dropping) cancels it.
#[derive(Debug, Default)]
pub struct ThrottleTask {
    handle: Option<JoinHandle<()>>,
}

impl ThrottleTask {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn set_enabled(&mut self, enabled: bool, to_agent: mpsc::Sender<ControllerMessage>) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        if enabled {
            self.handle = Some(tokio::spawn(run_ticker(to_agent)));
        }
    }
}

impl Drop for ThrottleTask {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

async fn run_ticker(to_agent: mpsc::Sender<ControllerMessage>) {
    let mut ticker = interval(TICK);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last_emit = Instant::now();

    loop {
        ticker.tick().await;
        if last_emit.elapsed() >= EMIT_EVERY {
            let msg = ControllerMessage::CpuThrottle {
                level: ThrottleLevel::Smooth,
                duration_ms: TICK.as_millis() as u64,
            };
            if to_agent.send(msg).await.is_err() {
                // Agent gone, nothing left to throttle.
                return;
            }
            last_emit = Instant::now();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_emits_once_per_second() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut task = ThrottleTask::new();
        task.set_enabled(true, tx);

        // Let the ticker task start before moving the clock.
        tokio::task::yield_now().await;
        for _ in 0..21 {
            tokio::time::advance(Duration::from_millis(100)).await;
        }

        let mut received = 0;
        while rx.try_recv().is_ok() {
            received += 1;
        }
        assert!(
            (1..=3).contains(&received),
            "expected ~2 throttle messages, got {received}"
        );

        task.set_enabled(false, mpsc::channel(1).0);
        assert!(task.handle.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_disable_stops_the_ticker() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut task = ThrottleTask::new();
        task.set_enabled(true, tx.clone());
        task.set_enabled(false, tx);

        tokio::time::advance(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
    }
}
