//! Application wiring
//!
//! Builds the controller and agent, connects them over the ipc channel
//! pair, and runs the event loop. All mutable state lives in the two
//! component structs; the loop itself owns nothing but the channel ends.

use crate::agent::page::PageHooks;
use crate::agent::ContentAgent;
use crate::controller::cleanup::CLEANUP_PERIOD;
use crate::controller::{AgentSignal, HostController};
use crate::ipc::{self, WindowState};
use crate::shell::ShellHooks;
use crate::storage::preferences::PerformancePreferences;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};

/// Why the run loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The window event source closed; normal shutdown.
    Shutdown,
    /// The agent asked for a relaunch; preferences are already persisted.
    RestartRequested,
}

/// Run the wrapper until the window event source closes or a restart is
/// requested. `events` is fed by the embedder's OS window callbacks.
pub async fn run<S, P>(
    shell: S,
    page: P,
    prefs: PerformancePreferences,
    prefs_path: PathBuf,
    mut events: mpsc::Receiver<WindowState>,
) -> RunOutcome
where
    S: ShellHooks + 'static,
    P: PageHooks + 'static,
{
    let (to_agent_tx, mut to_agent_rx, to_controller_tx, mut to_controller_rx) =
        ipc::channel_pair();

    let mut controller = HostController::new(shell, prefs, prefs_path, to_agent_tx);
    let mut agent = ContentAgent::new(page, to_controller_tx);

    // The agent runs as its own task, like the page process it stands in for.
    let agent_task = tokio::spawn(async move {
        while let Some(msg) = to_agent_rx.recv().await {
            agent.handle(msg).await;
        }
        tracing::debug!("Agent channel closed");
    });

    controller.start().await;

    let mut cleanup_timer = interval(CLEANUP_PERIOD);
    cleanup_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // interval fires immediately once; skip that initial tick.
    cleanup_timer.tick().await;

    let outcome = loop {
        tokio::select! {
            event = events.recv() => {
                match event {
                    Some(state) => controller.handle_window_event(state).await,
                    None => break RunOutcome::Shutdown,
                }
            }
            _ = cleanup_timer.tick() => {
                controller.on_cleanup_tick().await;
            }
            msg = to_controller_rx.recv() => {
                match msg {
                    Some(msg) => {
                        if controller.handle_agent_message(msg).await
                            == AgentSignal::RestartRequested
                        {
                            break RunOutcome::RestartRequested;
                        }
                    }
                    // Agent task gone; nothing left to drive.
                    None => break RunOutcome::Shutdown,
                }
            }
        }
    };

    drop(controller);
    agent_task.abort();
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::page::DetachedPage;
    use crate::shell::SystemShell;

    #[tokio::test]
    async fn test_run_shuts_down_when_event_source_closes() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, rx) = mpsc::channel(4);

        let handle = tokio::spawn(run(
            SystemShell::new(),
            DetachedPage,
            PerformancePreferences::default(),
            dir.path().join("preferences.json"),
            rx,
        ));

        tx.send(WindowState::Focused).await.unwrap();
        tx.send(WindowState::Blurred).await.unwrap();
        drop(tx);

        let outcome = handle.await.unwrap();
        assert_eq!(outcome, RunOutcome::Shutdown);
    }
}
