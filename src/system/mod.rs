//! System utilities
//!
//! OS-level capability hints the wrapper applies on a best-effort basis.

pub mod priority;

use thiserror::Error;

/// A capability the host OS may or may not provide.
///
/// Callers treat `Unsupported` as a no-op; the wrapper is a non-critical
/// optimization layer and never fails because an OS hint is unavailable.
#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error("capability not supported on this platform")]
    Unsupported,

    #[error("capability invocation failed: {0}")]
    Failed(String),
}
