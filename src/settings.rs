//! Game settings and tunables
//!
//! Persisted as JSON in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::consts::{ANIMATION_SPEED, BORDER_INSET, SPRITESHEET_URL, STICK_SPEED};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Movement ===
    /// Velocity per pixel of stick deflection
    pub stick_speed: f32,
    /// Distance kept between the player and the viewport edge
    pub border_inset: f32,

    // === Presentation ===
    /// Walk-cycle frames advanced per display frame
    pub animation_speed: f32,
    /// Clear colour as 0xRRGGBB
    pub background_color: u32,
    /// Sprite-sheet descriptor to load
    pub spritesheet_url: String,

    // === Diagnostics ===
    /// Log every touch event
    pub debug_logging: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            stick_speed: STICK_SPEED,
            border_inset: BORDER_INSET,

            animation_speed: ANIMATION_SPEED,
            background_color: 0xffffff,
            spritesheet_url: SPRITESHEET_URL.to_string(),

            debug_logging: false,
        }
    }
}

impl Settings {
    /// Log level the platform logger should use
    pub fn log_level(&self) -> log::Level {
        if self.debug_logging {
            log::Level::Debug
        } else {
            log::Level::Info
        }
    }

    /// Background colour as RGB components in 0..=1
    pub fn background_rgb(&self) -> [f64; 3] {
        let c = self.background_color;
        [
            ((c >> 16) & 0xff) as f64 / 255.0,
            ((c >> 8) & 0xff) as f64 / 255.0,
            (c & 0xff) as f64 / 255.0,
        ]
    }

    /// Parse settings JSON, falling back to defaults for missing fields
    pub fn from_json(json: &str) -> Option<Self> {
        match serde_json::from_str(json) {
            Ok(settings) => Some(settings),
            Err(e) => {
                log::warn!("Ignoring stored settings: {}", e);
                None
            }
        }
    }

    pub fn to_json(&self) -> Option<String> {
        serde_json::to_string(self).ok()
    }

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "touch_stick_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Some(settings) = Self::from_json(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Some(json) = self.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.stick_speed, 0.02);
        assert_eq!(settings.border_inset, 5.0);
        assert_eq!(settings.animation_speed, 0.3);
        assert_eq!(settings.background_rgb(), [1.0, 1.0, 1.0]);
        assert_eq!(settings.log_level(), log::Level::Info);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{"stick_speed": 0.05}"#).unwrap();
        assert_eq!(settings.stick_speed, 0.05);
        assert_eq!(settings.border_inset, 5.0);
        assert_eq!(settings.spritesheet_url, "images/spritesheet.json");
    }

    #[test]
    fn test_saved_json_reloads() {
        let settings = Settings {
            stick_speed: 0.04,
            background_color: 0x102030,
            debug_logging: true,
            ..Settings::default()
        };
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json), Some(settings));
    }

    #[test]
    fn test_bad_json_rejected() {
        assert!(Settings::from_json("not json").is_none());
    }
}
