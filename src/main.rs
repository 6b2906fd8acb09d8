//! wraplite entry point
//!
//! Launches the throttling layer and runs it until ctrl-c. The embedder
//! feeding real window events owns the other end of the event channel; run
//! standalone, the wrapper idles with the periodic cleanup cycle active.

use tracing_subscriber::EnvFilter;
use wraplite::agent::page::DetachedPage;
use wraplite::app::{self, RunOutcome};
use wraplite::shell::{EngineConfig, SystemShell};
use wraplite::storage::preferences;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let engine = EngineConfig::default();
    tracing::info!("wraplite starting, wrapping {}", engine.start_url);

    let prefs = preferences::load_preferences();
    let prefs_path = match wraplite::storage::get_data_dir() {
        Ok(dir) => dir.join("preferences.json"),
        Err(e) => {
            tracing::warn!("No data directory ({}), preferences will not persist", e);
            std::env::temp_dir().join("wraplite-preferences.json")
        }
    };

    let (_event_tx, event_rx) = tokio::sync::mpsc::channel(16);

    tokio::select! {
        outcome = app::run(SystemShell::new(), DetachedPage, prefs, prefs_path, event_rx) => {
            match outcome {
                RunOutcome::Shutdown => tracing::info!("Event source closed, exiting"),
                RunOutcome::RestartRequested => tracing::info!("Restart requested, exiting"),
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted, exiting");
        }
    }
}
