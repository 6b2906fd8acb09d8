//! Preference storage
//!
//! Manages persistence of the performance preference record: a flat set of
//! named boolean toggles plus the frame-rate ceiling. Loaded once at
//! startup, rewritten wholesale on every mutation.

use crate::storage::{get_data_dir, StorageError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Frame-rate ceilings the embedded view supports.
pub const SUPPORTED_FPS: [u32; 6] = [5, 10, 15, 20, 30, 60];

fn default_true() -> bool {
    true
}

fn default_target_fps() -> u32 {
    10
}

/// Performance preferences
///
/// Every field carries a serde default so a record written by an older
/// version (missing keys) still loads; unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformancePreferences {
    /// Short-circuit network requests matching the tracker denylist
    #[serde(default = "default_true")]
    pub block_resources: bool,
    /// Inject style rules suppressing animations and transitions
    #[serde(default = "default_true")]
    pub disable_animations: bool,
    /// Hide avatar images to cut image decode work
    #[serde(default)]
    pub hide_avatars: bool,
    /// Clamp the embedded view to `target_fps`
    #[serde(default = "default_true")]
    pub limit_frame_rate: bool,
    /// Throttle CPU while the window is blurred or minimized
    #[serde(default = "default_true")]
    pub background_throttling: bool,
    /// Allow the periodic aggressive cleanup pass
    #[serde(default = "default_true")]
    pub aggressive_cleanup: bool,
    /// Frame-rate ceiling while focused, one of [`SUPPORTED_FPS`]
    #[serde(default = "default_target_fps")]
    pub target_fps: u32,
}

impl Default for PerformancePreferences {
    fn default() -> Self {
        Self {
            block_resources: true,
            disable_animations: true,
            hide_avatars: false,
            limit_frame_rate: true,
            background_throttling: true,
            aggressive_cleanup: true,
            target_fps: default_target_fps(),
        }
    }
}

/// A named boolean toggle in the preference record.
///
/// The settings surface addresses toggles by name; parsing into this enum is
/// what makes an unknown key a validation error instead of a silent no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceKey {
    BlockResources,
    DisableAnimations,
    HideAvatars,
    LimitFrameRate,
    BackgroundThrottling,
    AggressiveCleanup,
}

impl PreferenceKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            PreferenceKey::BlockResources => "block_resources",
            PreferenceKey::DisableAnimations => "disable_animations",
            PreferenceKey::HideAvatars => "hide_avatars",
            PreferenceKey::LimitFrameRate => "limit_frame_rate",
            PreferenceKey::BackgroundThrottling => "background_throttling",
            PreferenceKey::AggressiveCleanup => "aggressive_cleanup",
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown preference key: {0}")]
pub struct UnknownKeyError(String);

impl FromStr for PreferenceKey {
    type Err = UnknownKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "block_resources" => Ok(PreferenceKey::BlockResources),
            "disable_animations" => Ok(PreferenceKey::DisableAnimations),
            "hide_avatars" => Ok(PreferenceKey::HideAvatars),
            "limit_frame_rate" => Ok(PreferenceKey::LimitFrameRate),
            "background_throttling" => Ok(PreferenceKey::BackgroundThrottling),
            "aggressive_cleanup" => Ok(PreferenceKey::AggressiveCleanup),
            other => Err(UnknownKeyError(other.to_string())),
        }
    }
}

impl PerformancePreferences {
    /// Single update entry point for boolean toggles.
    pub fn set(&mut self, key: PreferenceKey, value: bool) {
        match key {
            PreferenceKey::BlockResources => self.block_resources = value,
            PreferenceKey::DisableAnimations => self.disable_animations = value,
            PreferenceKey::HideAvatars => self.hide_avatars = value,
            PreferenceKey::LimitFrameRate => self.limit_frame_rate = value,
            PreferenceKey::BackgroundThrottling => self.background_throttling = value,
            PreferenceKey::AggressiveCleanup => self.aggressive_cleanup = value,
        }
    }

    pub fn get(&self, key: PreferenceKey) -> bool {
        match key {
            PreferenceKey::BlockResources => self.block_resources,
            PreferenceKey::DisableAnimations => self.disable_animations,
            PreferenceKey::HideAvatars => self.hide_avatars,
            PreferenceKey::LimitFrameRate => self.limit_frame_rate,
            PreferenceKey::BackgroundThrottling => self.background_throttling,
            PreferenceKey::AggressiveCleanup => self.aggressive_cleanup,
        }
    }

    /// Set the frame-rate ceiling, snapping to the nearest supported value.
    pub fn set_target_fps(&mut self, fps: u32) {
        self.target_fps = fps;
        self.validate();
    }

    /// Validate preference values
    ///
    /// Snaps `target_fps` to the nearest supported ceiling.
    pub fn validate(&mut self) {
        if !SUPPORTED_FPS.contains(&self.target_fps) {
            self.target_fps = *SUPPORTED_FPS
                .iter()
                .min_by_key(|&&fps| (fps as i64 - self.target_fps as i64).abs())
                .unwrap_or(&default_target_fps());
        }
    }
}

/// Get the preferences file path
fn get_preferences_path() -> Result<PathBuf, StorageError> {
    Ok(get_data_dir()?.join("preferences.json"))
}

/// Load preferences from disk
///
/// Returns the default record if the file doesn't exist or is corrupted.
pub fn load_preferences() -> PerformancePreferences {
    match get_preferences_path().and_then(|path| load_preferences_from(&path)) {
        Ok(prefs) => prefs,
        Err(e) => {
            tracing::warn!("Failed to load preferences, using defaults: {}", e);
            PerformancePreferences::default()
        }
    }
}

/// Internal preference loading with error propagation
pub(crate) fn load_preferences_from(path: &Path) -> Result<PerformancePreferences, StorageError> {
    if !path.exists() {
        tracing::info!("Preferences file not found, using defaults");
        return Ok(PerformancePreferences::default());
    }

    let json = fs::read_to_string(path)?;
    let mut prefs: PerformancePreferences = serde_json::from_str(&json)?;
    prefs.validate();

    tracing::debug!("Loaded preferences from disk");
    Ok(prefs)
}

/// Save preferences to disk
pub fn save_preferences(prefs: &PerformancePreferences) -> Result<(), StorageError> {
    let path = get_preferences_path()?;
    save_preferences_to(&path, prefs)
}

/// Write the whole record through a temp file so a crash mid-write never
/// leaves a half-written record behind.
pub(crate) fn save_preferences_to(
    path: &Path,
    prefs: &PerformancePreferences,
) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(prefs)?;
    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, json)?;
    fs::rename(&temp_path, path)?;

    tracing::debug!("Saved preferences to disk");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_preferences() {
        let prefs = PerformancePreferences::default();
        assert!(prefs.block_resources);
        assert!(prefs.disable_animations);
        assert!(!prefs.hide_avatars);
        assert!(prefs.limit_frame_rate);
        assert!(prefs.background_throttling);
        assert!(prefs.aggressive_cleanup);
        assert_eq!(prefs.target_fps, 10);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");

        let prefs = load_preferences_from(&path).unwrap();
        assert_eq!(prefs, PerformancePreferences::default());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, "{not json").unwrap();

        // The public loader maps this to the default record.
        assert!(load_preferences_from(&path).is_err());
    }

    #[test]
    fn test_missing_keys_fall_back_to_defaults() {
        let prefs: PerformancePreferences = serde_json::from_str("{}").unwrap();
        assert_eq!(prefs, PerformancePreferences::default());
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let json = r#"{"hide_avatars": true, "some_future_toggle": false}"#;
        let prefs: PerformancePreferences = serde_json::from_str(json).unwrap();
        assert!(prefs.hide_avatars);
    }

    #[test]
    fn test_toggle_persists_only_that_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");

        let mut prefs = PerformancePreferences::default();
        save_preferences_to(&path, &prefs).unwrap();

        prefs.set(PreferenceKey::HideAvatars, true);
        save_preferences_to(&path, &prefs).unwrap();

        let reloaded = load_preferences_from(&path).unwrap();
        assert!(reloaded.hide_avatars);

        let defaults = PerformancePreferences::default();
        assert_eq!(reloaded.block_resources, defaults.block_resources);
        assert_eq!(reloaded.disable_animations, defaults.disable_animations);
        assert_eq!(reloaded.limit_frame_rate, defaults.limit_frame_rate);
        assert_eq!(reloaded.background_throttling, defaults.background_throttling);
        assert_eq!(reloaded.aggressive_cleanup, defaults.aggressive_cleanup);
        assert_eq!(reloaded.target_fps, defaults.target_fps);
    }

    #[test]
    fn test_key_round_trip() {
        for key in [
            PreferenceKey::BlockResources,
            PreferenceKey::DisableAnimations,
            PreferenceKey::HideAvatars,
            PreferenceKey::LimitFrameRate,
            PreferenceKey::BackgroundThrottling,
            PreferenceKey::AggressiveCleanup,
        ] {
            assert_eq!(key.as_str().parse::<PreferenceKey>().unwrap(), key);
        }
        assert!("frobnicate".parse::<PreferenceKey>().is_err());
    }

    #[test]
    fn test_target_fps_snaps_to_supported() {
        let mut prefs = PerformancePreferences::default();
        prefs.set_target_fps(12);
        assert_eq!(prefs.target_fps, 10);

        prefs.set_target_fps(0);
        assert_eq!(prefs.target_fps, 5);

        prefs.set_target_fps(144);
        assert_eq!(prefs.target_fps, 60);

        prefs.set_target_fps(30);
        assert_eq!(prefs.target_fps, 30);
    }
}
