//! Player preferences
//!
//! Loaded from an optional JSON file at startup. The volume is also
//! adjustable at runtime through the menu slider.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Default volume for cues and music
pub const DEFAULT_VOLUME: f32 = 0.5;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Volume applied to all cues and music (0.0 - 1.0)
    pub volume: f32,
    /// Draw the tank's track trail
    pub trails: bool,
    /// Draw the ammo/level HUD
    pub hud: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            volume: DEFAULT_VOLUME,
            trails: true,
            hud: true,
        }
    }
}

impl Settings {
    /// Parse settings from JSON, clamping the volume into range
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.volume = if settings.volume.is_finite() {
            settings.volume.clamp(0.0, 1.0)
        } else {
            DEFAULT_VOLUME
        };
        Ok(settings)
    }

    /// Load settings from a JSON file, falling back to defaults on any error
    pub fn load(path: &Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::info!("No settings at {} ({e}); using defaults", path.display());
                return Self::default();
            }
        };

        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!(
                    "Invalid settings file {}: {e}; using defaults",
                    path.display()
                );
                Self::default()
            }
        }
    }
}
