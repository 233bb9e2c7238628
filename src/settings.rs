//! Player preferences
//!
//! Persisted as JSON in LocalStorage; native builds always use defaults.

use serde::{Deserialize, Serialize};

/// Runner settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Start with hitbox outlines on (last debug toggle wins)
    pub show_hitboxes: bool,
    /// Freeze cloud parallax and grass sway
    pub reduced_motion: bool,
    /// Show the combo counter in the HUD
    pub show_combo: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_hitboxes: false,
            reduced_motion: false,
            show_combo: true,
        }
    }
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "echo_runner_settings";

    /// Parse stored JSON; anything unreadable falls back to defaults
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring stored settings: {}", e);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
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
            match self.to_json() {
                Ok(json) => {
                    if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                        log::warn!("Could not write settings to LocalStorage");
                    } else {
                        log::info!("Settings saved");
                    }
                }
                Err(e) => log::error!("Failed to serialize settings: {}", e),
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        log::debug!("No storage for {} on native", Self::STORAGE_KEY);
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
        let s = Settings::default();
        assert!(!s.show_hitboxes);
        assert!(!s.reduced_motion);
        assert!(s.show_combo);
    }

    #[test]
    fn test_json_round_trip() {
        let s = Settings {
            show_hitboxes: true,
            reduced_motion: true,
            show_combo: false,
        };
        let json = s.to_json().unwrap();
        assert_eq!(Settings::from_json(&json), s);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let s = Settings::from_json(r#"{"show_hitboxes":true}"#);
        assert!(s.show_hitboxes);
        assert!(s.show_combo);
    }

    #[test]
    fn test_garbage_falls_back_to_defaults() {
        assert_eq!(Settings::from_json("not json"), Settings::default());
    }
}
