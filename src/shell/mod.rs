//! Embedder seam
//!
//! The browser engine that actually displays the wrapped web application is
//! an external collaborator. The controller drives it only through the
//! [`ShellHooks`] trait, so every throttling decision stays testable without
//! a webview. [`EngineConfig`] is the static configuration an embedder
//! applies before creating the window.

use crate::system::{priority, CapabilityError};

/// Handle to an active wake-lock acquisition.
pub type WakeLockId = u32;

/// Operations the controller needs from whatever hosts the embedded view.
///
/// Every hook is best effort: a `CapabilityError` is treated as a no-op by
/// the caller.
pub trait ShellHooks: Send {
    /// Set the embedded view's target frame rate
    fn set_frame_rate(&mut self, fps: u32);

    /// Prevent app suspension while the window is focused
    fn start_wake_lock(&mut self) -> Result<WakeLockId, CapabilityError>;

    /// Release a previously acquired wake lock
    fn stop_wake_lock(&mut self, id: WakeLockId);

    /// Request a lower OS scheduling priority for the wrapper process
    fn lower_priority(&mut self) -> Result<(), CapabilityError>;

    /// Hint the host runtime to collect garbage
    fn hint_gc(&mut self);
}

/// Shell implementation for hosts without an embedder attached.
///
/// Applies the OS-level hints the crate can reach directly and logs the
/// rest. Wake locks are reported unsupported; a real embedder supplies its
/// own provider.
#[derive(Debug, Default)]
pub struct SystemShell {
    frame_rate: Option<u32>,
}

impl SystemShell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last frame rate requested through this shell, if any.
    pub fn frame_rate(&self) -> Option<u32> {
        self.frame_rate
    }
}

impl ShellHooks for SystemShell {
    fn set_frame_rate(&mut self, fps: u32) {
        tracing::info!("Target frame rate set to {} fps", fps);
        self.frame_rate = Some(fps);
    }

    fn start_wake_lock(&mut self) -> Result<WakeLockId, CapabilityError> {
        Err(CapabilityError::Unsupported)
    }

    fn stop_wake_lock(&mut self, _id: WakeLockId) {}

    fn lower_priority(&mut self) -> Result<(), CapabilityError> {
        priority::lower_process_priority()
    }

    fn hint_gc(&mut self) {
        tracing::trace!("GC hint (no runtime attached)");
    }
}

/// User-Agent string presented to the wrapped site. The stock embedder UA
/// gets the site's degraded "unsupported browser" page.
pub const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Static engine configuration an embedder applies before creating the
/// window: spoofed UA, start URL, window dimensions, and the engine switch
/// list that trims GPU/renderer work.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub user_agent: String,
    pub start_url: String,
    pub width: u32,
    pub height: u32,
    /// Engine command-line switches as (name, optional value) pairs
    pub switches: Vec<(String, Option<String>)>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            user_agent: USER_AGENT.to_string(),
            start_url: "https://web.whatsapp.com/".to_string(),
            width: 800,
            height: 600,
            switches: vec![
                ("disable-renderer-backgrounding".to_string(), None),
                ("js-flags".to_string(), Some("--expose-gc".to_string())),
                ("disable-software-rasterizer".to_string(), None),
                ("disable-gpu".to_string(), None),
                ("high-dpi-support".to_string(), Some("1".to_string())),
                ("force-device-scale-factor".to_string(), Some("1".to_string())),
            ],
        }
    }
}
