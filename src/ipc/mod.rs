//! Controller/agent message channel
//!
//! The two halves of the wrapper talk over one mpsc channel per direction.
//! Delivery is asynchronous, at-most-once per send, FIFO per channel, with
//! no acknowledgment. Payloads are owned copies: the preference record is
//! cloned into messages, never shared across the boundary.

use crate::storage::preferences::PerformancePreferences;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// OS-level visibility/focus condition of the wrapped window.
///
/// Transitions are driven solely by OS callbacks; the windowing system
/// guarantees mutual exclusivity of focus/blur and minimize/restore, so no
/// illegal-transition validation is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowState {
    Focused,
    Blurred,
    Minimized,
    Restored,
}

/// How hard a CPU throttle pass should bite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThrottleLevel {
    Smooth,
    Aggressive,
}

/// Messages from the Host Controller to the Content Agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ControllerMessage {
    /// Drives the agent's DOM mitigation policy
    WindowState(WindowState),
    /// Applies timer/frame rate limiting for `duration_ms`
    CpuThrottle { level: ThrottleLevel, duration_ms: u64 },
    /// Light resource release (caches, GC hint)
    LightCleanup,
    /// Full resource release: light cleanup plus media/animation pause
    AggressiveCleanup,
    /// Informs the agent of the active toggle set
    PerformanceSettings(PerformancePreferences),
}

/// Messages from the Content Agent back to the Host Controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentMessage {
    /// Ask the controller to lower the target frame rate further
    ReduceCpuUsage,
    /// Persist settings and offer a relaunch
    RestartApp,
}

/// Channel depth. Messages are tiny and senders never need deep queues.
pub const CHANNEL_CAPACITY: usize = 32;

/// Build the controller→agent and agent→controller channel pair.
pub fn channel_pair() -> (
    mpsc::Sender<ControllerMessage>,
    mpsc::Receiver<ControllerMessage>,
    mpsc::Sender<AgentMessage>,
    mpsc::Receiver<AgentMessage>,
) {
    let (to_agent_tx, to_agent_rx) = mpsc::channel(CHANNEL_CAPACITY);
    let (to_controller_tx, to_controller_rx) = mpsc::channel(CHANNEL_CAPACITY);
    (to_agent_tx, to_agent_rx, to_controller_tx, to_controller_rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_serialization() {
        let msg = ControllerMessage::CpuThrottle {
            level: ThrottleLevel::Smooth,
            duration_ms: 100,
        };
        let json = serde_json::to_string(&msg).unwrap();
        let back: ControllerMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(msg, back);
    }

    #[test]
    fn test_window_state_wire_names() {
        let json = serde_json::to_string(&WindowState::Minimized).unwrap();
        assert_eq!(json, "\"minimized\"");
    }
}
