//! Host Controller
//!
//! Owns the window lifecycle side of the wrapper: translates OS
//! focus/visibility callbacks into the four-value [`WindowState`], applies
//! shell-level side effects (wake lock, frame rate, priority hint), runs the
//! periodic cleanup and CPU throttle timers, and exposes the settings
//! surface. All state lives in the controller struct; there are no hidden
//! globals.

pub mod cleanup;
pub mod throttle;

use crate::controller::cleanup::{CleanupCycle, CleanupKind};
use crate::controller::throttle::ThrottleTask;
use crate::ipc::{AgentMessage, ControllerMessage, WindowState};
use crate::shell::{ShellHooks, WakeLockId};
use crate::storage::preferences::{
    save_preferences_to, PerformancePreferences, PreferenceKey,
};
use std::path::PathBuf;
use tokio::sync::mpsc;

/// Frame rate while the agent has asked for extra CPU relief.
pub const REDUCED_FPS: u32 = 5;

/// Frame rate when the user has switched the limiter off.
pub const UNLIMITED_FPS: u32 = 60;

/// What the run loop should do after an agent message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentSignal {
    Continue,
    RestartRequested,
}

pub struct HostController<S: ShellHooks> {
    shell: S,
    prefs: PerformancePreferences,
    prefs_path: PathBuf,
    wake_lock: Option<WakeLockId>,
    minimized: bool,
    cleanup: CleanupCycle,
    throttle: ThrottleTask,
    to_agent: mpsc::Sender<ControllerMessage>,
}

impl<S: ShellHooks> HostController<S> {
    pub fn new(
        shell: S,
        prefs: PerformancePreferences,
        prefs_path: PathBuf,
        to_agent: mpsc::Sender<ControllerMessage>,
    ) -> Self {
        Self {
            shell,
            prefs,
            prefs_path,
            wake_lock: None,
            minimized: false,
            cleanup: CleanupCycle::new(),
            throttle: ThrottleTask::new(),
            to_agent,
        }
    }

    /// Apply startup side effects: initial frame rate and the active toggle
    /// set, the equivalent of the original page-loaded hook.
    pub async fn start(&mut self) {
        self.shell.set_frame_rate(self.foreground_fps());
        self.send(ControllerMessage::PerformanceSettings(self.prefs.clone()))
            .await;
    }

    /// Translate one OS window callback into side effects and agent
    /// notifications. Transition legality is the windowing system's problem,
    /// not ours.
    pub async fn handle_window_event(&mut self, state: WindowState) {
        match state {
            WindowState::Focused => {
                if self.wake_lock.is_none() {
                    match self.shell.start_wake_lock() {
                        Ok(id) => self.wake_lock = Some(id),
                        Err(e) => tracing::debug!("Wake lock unavailable: {}", e),
                    }
                }
                self.minimized = false;
                self.set_throttling(false);
                self.shell.set_frame_rate(self.foreground_fps());
                self.send(ControllerMessage::WindowState(state)).await;
            }
            WindowState::Blurred => {
                if let Some(id) = self.wake_lock.take() {
                    self.shell.stop_wake_lock(id);
                }
                self.set_throttling(true);
                if let Err(e) = self.shell.lower_priority() {
                    tracing::debug!("Priority hint unavailable: {}", e);
                }
                self.send(ControllerMessage::WindowState(state)).await;
            }
            WindowState::Minimized => {
                self.minimized = true;
                self.set_throttling(true);
                self.send(ControllerMessage::WindowState(state)).await;
                // One aggressive pass right away; the periodic cycle restarts
                // behind it.
                if self.prefs.aggressive_cleanup {
                    self.send(ControllerMessage::AggressiveCleanup).await;
                    self.shell.hint_gc();
                    self.cleanup.reset();
                }
            }
            WindowState::Restored => {
                self.minimized = false;
                self.set_throttling(false);
                self.shell.set_frame_rate(self.foreground_fps());
                self.send(ControllerMessage::WindowState(state)).await;
            }
        }
    }

    /// One pass of the periodic cleanup timer.
    pub async fn on_cleanup_tick(&mut self) {
        let kind = if self.prefs.aggressive_cleanup {
            self.cleanup.on_tick(self.minimized)
        } else {
            CleanupKind::Light
        };
        match kind {
            CleanupKind::Light => self.send(ControllerMessage::LightCleanup).await,
            CleanupKind::Aggressive => {
                self.send(ControllerMessage::AggressiveCleanup).await;
                self.shell.hint_gc();
            }
        }
    }

    /// React to a message from the Content Agent.
    pub async fn handle_agent_message(&mut self, msg: AgentMessage) -> AgentSignal {
        match msg {
            AgentMessage::ReduceCpuUsage => {
                tracing::debug!("Agent requested extra CPU relief");
                self.shell.set_frame_rate(REDUCED_FPS);
                AgentSignal::Continue
            }
            AgentMessage::RestartApp => {
                tracing::info!("Restart requested, persisting preferences");
                self.persist();
                AgentSignal::RestartRequested
            }
        }
    }

    /// Copy of the current preference record.
    pub fn preferences(&self) -> PerformancePreferences {
        self.prefs.clone()
    }

    /// Flip one toggle, persist the record wholesale, and re-send the active
    /// set to the agent.
    pub async fn set_toggle(&mut self, key: PreferenceKey, value: bool) {
        self.prefs.set(key, value);
        self.persist();
        if key == PreferenceKey::LimitFrameRate && !self.minimized {
            self.shell.set_frame_rate(self.foreground_fps());
        }
        self.send(ControllerMessage::PerformanceSettings(self.prefs.clone()))
            .await;
    }

    /// Change the frame-rate ceiling (snapped to the supported set).
    pub async fn set_target_fps(&mut self, fps: u32) {
        self.prefs.set_target_fps(fps);
        self.persist();
        if !self.minimized {
            self.shell.set_frame_rate(self.foreground_fps());
        }
        self.send(ControllerMessage::PerformanceSettings(self.prefs.clone()))
            .await;
    }

    fn foreground_fps(&self) -> u32 {
        if self.prefs.limit_frame_rate {
            self.prefs.target_fps
        } else {
            UNLIMITED_FPS
        }
    }

    fn set_throttling(&mut self, on: bool) {
        let on = on && self.prefs.background_throttling;
        self.throttle.set_enabled(on, self.to_agent.clone());
    }

    fn persist(&self) {
        if let Err(e) = save_preferences_to(&self.prefs_path, &self.prefs) {
            tracing::warn!("Failed to persist preferences: {}", e);
        }
    }

    async fn send(&self, msg: ControllerMessage) {
        if self.to_agent.send(msg).await.is_err() {
            tracing::debug!("Agent channel closed, dropping message");
        }
    }
}
