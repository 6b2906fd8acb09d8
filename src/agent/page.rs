//! Page seam
//!
//! The agent never touches a DOM directly; it drives the embedded page
//! through [`PageHooks`]. Each hook maps to one in-page mitigation and is
//! allowed to fail independently (a missing DOM API on one hook must not
//! block the others).

use thiserror::Error;

/// A page-side API the current engine doesn't expose.
#[derive(Debug, Error)]
#[error("page api unavailable: {0}")]
pub struct PageError(pub &'static str);

/// In-page mitigation primitives.
pub trait PageHooks: Send {
    /// Pause any playing media elements
    fn pause_media(&mut self) -> Result<(), PageError>;

    /// Freeze running animations (`animation-play-state: paused`)
    fn set_animations_paused(&mut self, paused: bool) -> Result<(), PageError>;

    /// Inject/remove the style rules killing animations and transitions
    fn set_animations_suppressed(&mut self, suppressed: bool) -> Result<(), PageError>;

    /// Inject/remove the style rules dropping shadows and backdrop filters
    fn set_reduced_effects(&mut self, reduced: bool) -> Result<(), PageError>;

    /// Hide avatar images to cut decode work
    fn set_avatars_hidden(&mut self, hidden: bool) -> Result<(), PageError>;

    /// Connect or disconnect the DOM-mutation watcher that lazy-loads media
    fn set_mutation_watcher(&mut self, connected: bool) -> Result<(), PageError>;

    /// Hide the document body entirely (minimized windows render nothing)
    fn set_body_hidden(&mut self, hidden: bool) -> Result<(), PageError>;

    /// Clamp timer callbacks to at least this delay; `None` lifts the clamp
    fn set_min_timer_delay(&mut self, min_delay_ms: Option<u64>) -> Result<(), PageError>;

    /// Drop page-level caches
    fn clear_caches(&mut self) -> Result<(), PageError>;

    /// Hint the JS runtime to collect garbage
    fn hint_gc(&mut self) -> Result<(), PageError>;
}

/// Page implementation for hosts without an embedded page attached. Every
/// hook reports the API as unavailable, which the agent treats as a no-op.
#[derive(Debug, Default)]
pub struct DetachedPage;

impl PageHooks for DetachedPage {
    fn pause_media(&mut self) -> Result<(), PageError> {
        Err(PageError("media"))
    }

    fn set_animations_paused(&mut self, _paused: bool) -> Result<(), PageError> {
        Err(PageError("animations"))
    }

    fn set_animations_suppressed(&mut self, _suppressed: bool) -> Result<(), PageError> {
        Err(PageError("styles"))
    }

    fn set_reduced_effects(&mut self, _reduced: bool) -> Result<(), PageError> {
        Err(PageError("styles"))
    }

    fn set_avatars_hidden(&mut self, _hidden: bool) -> Result<(), PageError> {
        Err(PageError("styles"))
    }

    fn set_mutation_watcher(&mut self, _connected: bool) -> Result<(), PageError> {
        Err(PageError("mutation observer"))
    }

    fn set_body_hidden(&mut self, _hidden: bool) -> Result<(), PageError> {
        Err(PageError("body"))
    }

    fn set_min_timer_delay(&mut self, _min_delay_ms: Option<u64>) -> Result<(), PageError> {
        Err(PageError("timers"))
    }

    fn clear_caches(&mut self) -> Result<(), PageError> {
        Err(PageError("caches"))
    }

    fn hint_gc(&mut self) -> Result<(), PageError> {
        Err(PageError("gc"))
    }
}
