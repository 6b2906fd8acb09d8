//! Content Agent
//!
//! The page-side half of the wrapper. Receives state and cleanup messages
//! from the Host Controller and applies in-page mitigations through the
//! [`PageHooks`] seam. Mitigations are best effort: each failure is logged
//! and swallowed so one missing DOM API never blocks the others. The agent
//! sends nothing back except the occasional [`AgentMessage`].

pub mod frame_limiter;
pub mod net_filter;
pub mod page;

use crate::agent::frame_limiter::FrameLimiter;
use crate::agent::net_filter::{InterceptedResponse, NetFilter};
use crate::agent::page::{PageError, PageHooks};
use crate::ipc::{AgentMessage, ControllerMessage, WindowState};
use crate::storage::preferences::PerformancePreferences;
use tokio::sync::mpsc;

pub struct ContentAgent<P: PageHooks> {
    page: P,
    prefs: PerformancePreferences,
    limiter: FrameLimiter,
    filter: NetFilter,
    to_controller: mpsc::Sender<AgentMessage>,
}

impl<P: PageHooks> ContentAgent<P> {
    pub fn new(page: P, to_controller: mpsc::Sender<AgentMessage>) -> Self {
        let prefs = PerformancePreferences::default();
        let limiter = FrameLimiter::new(prefs.target_fps);
        Self {
            page,
            prefs,
            limiter,
            filter: NetFilter::default(),
            to_controller,
        }
    }

    /// Process one message from the controller. Never fails; individual
    /// mitigations degrade independently.
    pub async fn handle(&mut self, msg: ControllerMessage) {
        match msg {
            ControllerMessage::WindowState(state) => self.apply_window_state(state).await,
            ControllerMessage::CpuThrottle { level, duration_ms } => {
                tracing::trace!("CPU throttle: {:?} for {} ms", level, duration_ms);
                mitigate(
                    "clamp timers",
                    self.page.set_min_timer_delay(Some(duration_ms)),
                );
            }
            ControllerMessage::LightCleanup => self.light_cleanup(),
            ControllerMessage::AggressiveCleanup => self.aggressive_cleanup(),
            ControllerMessage::PerformanceSettings(prefs) => self.apply_settings(prefs),
        }
    }

    /// Synthetic response for a fetch the page is about to issue, if the
    /// denylist filter wants to short-circuit it.
    pub fn intercept_request(&self, url: &str) -> Option<InterceptedResponse> {
        if self.prefs.block_resources {
            self.filter.intercept(url)
        } else {
            None
        }
    }

    /// The rate limiter the page's animation-frame wrapper polls.
    pub fn frame_limiter(&mut self) -> &mut FrameLimiter {
        &mut self.limiter
    }

    /// Ask the host to persist settings and offer a relaunch. Wired to the
    /// settings UI inside the page.
    pub async fn request_restart(&self) {
        if self.to_controller.send(AgentMessage::RestartApp).await.is_err() {
            tracing::debug!("Controller channel closed");
        }
    }

    async fn apply_window_state(&mut self, state: WindowState) {
        tracing::debug!("Window state: {:?}", state);
        match state {
            WindowState::Minimized => {
                mitigate("hide body", self.page.set_body_hidden(true));
                mitigate("pause watcher", self.page.set_mutation_watcher(false));
                if self.to_controller.send(AgentMessage::ReduceCpuUsage).await.is_err() {
                    tracing::debug!("Controller channel closed");
                }
            }
            WindowState::Blurred => {
                self.light_cleanup();
            }
            WindowState::Focused | WindowState::Restored => {
                mitigate("show body", self.page.set_body_hidden(false));
                mitigate("resume watcher", self.page.set_mutation_watcher(true));
                mitigate("resume animations", self.page.set_animations_paused(false));
                mitigate("lift timer clamp", self.page.set_min_timer_delay(None));
            }
        }
    }

    fn light_cleanup(&mut self) {
        mitigate("clear caches", self.page.clear_caches());
        mitigate("gc hint", self.page.hint_gc());
    }

    fn aggressive_cleanup(&mut self) {
        self.light_cleanup();
        mitigate("pause media", self.page.pause_media());
        mitigate("pause animations", self.page.set_animations_paused(true));
    }

    fn apply_settings(&mut self, prefs: PerformancePreferences) {
        self.limiter.set_target_fps(prefs.target_fps);
        mitigate(
            "animation suppression",
            self.page.set_animations_suppressed(prefs.disable_animations),
        );
        mitigate(
            "reduced effects",
            self.page.set_reduced_effects(prefs.disable_animations),
        );
        mitigate(
            "avatar visibility",
            self.page.set_avatars_hidden(prefs.hide_avatars),
        );
        self.prefs = prefs;
    }
}

/// Run one mitigation, logging and swallowing its failure.
fn mitigate(what: &str, result: Result<(), PageError>) {
    if let Err(e) = result {
        tracing::debug!("Mitigation '{}' skipped: {}", what, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    /// Page double that records which hooks fired and can be told to fail
    /// specific ones.
    #[derive(Default)]
    struct RecordingPage {
        calls: Vec<String>,
        failing: HashSet<&'static str>,
        body_hidden: bool,
        media_paused: bool,
    }

    impl RecordingPage {
        fn record(&mut self, name: &'static str) -> Result<(), PageError> {
            if self.failing.contains(name) {
                return Err(PageError(name));
            }
            self.calls.push(name.to_string());
            Ok(())
        }
    }

    impl PageHooks for RecordingPage {
        fn pause_media(&mut self) -> Result<(), PageError> {
            self.record("pause_media")?;
            self.media_paused = true;
            Ok(())
        }

        fn set_animations_paused(&mut self, _paused: bool) -> Result<(), PageError> {
            self.record("set_animations_paused")
        }

        fn set_animations_suppressed(&mut self, _suppressed: bool) -> Result<(), PageError> {
            self.record("set_animations_suppressed")
        }

        fn set_reduced_effects(&mut self, _reduced: bool) -> Result<(), PageError> {
            self.record("set_reduced_effects")
        }

        fn set_avatars_hidden(&mut self, _hidden: bool) -> Result<(), PageError> {
            self.record("set_avatars_hidden")
        }

        fn set_mutation_watcher(&mut self, _connected: bool) -> Result<(), PageError> {
            self.record("set_mutation_watcher")
        }

        fn set_body_hidden(&mut self, hidden: bool) -> Result<(), PageError> {
            self.record("set_body_hidden")?;
            self.body_hidden = hidden;
            Ok(())
        }

        fn set_min_timer_delay(&mut self, _min_delay_ms: Option<u64>) -> Result<(), PageError> {
            self.record("set_min_timer_delay")
        }

        fn clear_caches(&mut self) -> Result<(), PageError> {
            self.record("clear_caches")
        }

        fn hint_gc(&mut self) -> Result<(), PageError> {
            self.record("hint_gc")
        }
    }

    fn agent() -> (ContentAgent<RecordingPage>, mpsc::Receiver<AgentMessage>) {
        let (tx, rx) = mpsc::channel(8);
        (ContentAgent::new(RecordingPage::default(), tx), rx)
    }

    #[tokio::test]
    async fn test_minimized_hides_body_and_asks_for_relief() {
        let (mut agent, mut rx) = agent();
        agent
            .handle(ControllerMessage::WindowState(WindowState::Minimized))
            .await;

        assert!(agent.page.body_hidden);
        assert_eq!(rx.try_recv().unwrap(), AgentMessage::ReduceCpuUsage);
    }

    #[tokio::test]
    async fn test_restored_shows_body_again() {
        let (mut agent, _rx) = agent();
        agent
            .handle(ControllerMessage::WindowState(WindowState::Minimized))
            .await;
        agent
            .handle(ControllerMessage::WindowState(WindowState::Restored))
            .await;

        assert!(!agent.page.body_hidden);
    }

    #[tokio::test]
    async fn test_aggressive_cleanup_pauses_media() {
        let (mut agent, _rx) = agent();
        agent.handle(ControllerMessage::AggressiveCleanup).await;

        assert!(agent.page.media_paused);
        assert!(agent.page.calls.contains(&"clear_caches".to_string()));
    }

    #[tokio::test]
    async fn test_failing_mitigation_does_not_block_siblings() {
        let (tx, _rx) = mpsc::channel(8);
        let mut page = RecordingPage::default();
        page.failing.insert("pause_media");
        let mut agent = ContentAgent::new(page, tx);

        agent.handle(ControllerMessage::AggressiveCleanup).await;

        // Media pause failed, but the animation pause after it still ran.
        assert!(!agent.page.media_paused);
        assert!(agent
            .page
            .calls
            .contains(&"set_animations_paused".to_string()));
    }

    #[tokio::test]
    async fn test_settings_drive_filter_and_limiter() {
        let (mut agent, _rx) = agent();

        let mut prefs = PerformancePreferences::default();
        prefs.block_resources = false;
        prefs.target_fps = 30;
        agent
            .handle(ControllerMessage::PerformanceSettings(prefs))
            .await;

        assert!(agent.intercept_request("https://x.com/analytics").is_none());
        assert_eq!(
            agent.frame_limiter().interval(),
            std::time::Duration::from_secs_f64(1.0 / 30.0)
        );
    }

    #[tokio::test]
    async fn test_restart_request_reaches_the_controller() {
        let (agent, mut rx) = agent();
        agent.request_restart().await;
        assert_eq!(rx.try_recv().unwrap(), AgentMessage::RestartApp);
    }

    #[tokio::test]
    async fn test_blocked_request_yields_empty_ok() {
        let (agent, _rx) = agent();
        let resp = agent
            .intercept_request("https://cdn.example.com/tracking.js")
            .expect("should be blocked");
        assert_eq!(resp.status, 200);
        assert!(resp.body.is_empty());
    }
}
