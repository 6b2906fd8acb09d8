//! Network request filter
//!
//! Short-circuits outgoing fetches whose URL contains a denylist substring.
//! Matching is case-insensitive; a hit yields an empty successful response
//! so page code sees a completed request, not an error.

use once_cell::sync::Lazy;

/// Tracker/telemetry substrings blocked by default.
pub static DEFAULT_DENYLIST: Lazy<Vec<String>> = Lazy::new(|| {
    [
        "google analytics",
        "facebook",
        "twitter",
        "tracking",
        "analytics",
        "telemetry",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
});

/// The synthetic response handed back for a blocked request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterceptedResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl InterceptedResponse {
    fn empty_ok() -> Self {
        Self {
            status: 200,
            body: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NetFilter {
    /// Lowercased denylist substrings
    patterns: Vec<String>,
}

impl Default for NetFilter {
    fn default() -> Self {
        Self::new(DEFAULT_DENYLIST.clone())
    }
}

impl NetFilter {
    pub fn new(patterns: Vec<String>) -> Self {
        Self {
            patterns: patterns.into_iter().map(|p| p.to_lowercase()).collect(),
        }
    }

    /// Decide whether `url` should be short-circuited. `Some` carries the
    /// empty 200 response to hand back; `None` lets the request through
    /// unmodified.
    pub fn intercept(&self, url: &str) -> Option<InterceptedResponse> {
        let url = url.to_lowercase();
        if self.patterns.iter().any(|p| url.contains(p.as_str())) {
            Some(InterceptedResponse::empty_ok())
        } else {
            None
        }
    }
}
