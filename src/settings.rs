//! Player preferences
//!
//! Persisted as one JSON blob next to the best records.

use serde::{Deserialize, Serialize};

use crate::persistence::KeyValueStore;
use crate::sim::GameMode;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Rule set used for the next run
    pub mode: GameMode,
    /// Whether feedback cues should be played
    pub sound_enabled: bool,
    /// Minimap overlay
    pub show_minimap: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: GameMode::Normal,
            sound_enabled: true,
            show_minimap: true,
        }
    }
}

impl Settings {
    /// Storage key
    const STORAGE_KEY: &'static str = "maze_runner_settings";

    /// Load settings, falling back to defaults on any failure
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let raw = match store.get(Self::STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                log::info!("Using default settings");
                return Self::default();
            }
            Err(e) => {
                log::warn!("Failed to read settings: {e}");
                return Self::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(settings) => {
                log::info!("Loaded settings");
                settings
            }
            Err(e) => {
                log::warn!("Discarding malformed settings: {e}");
                Self::default()
            }
        }
    }

    /// Save settings; failures are logged and otherwise ignored
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        let json = match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Failed to encode settings: {e}");
                return;
            }
        };
        match store.set(Self::STORAGE_KEY, &json) {
            Ok(()) => log::debug!("Settings saved"),
            Err(e) => log::warn!("Failed to save settings: {e}"),
        }
    }
}
