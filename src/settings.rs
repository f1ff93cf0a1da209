//! Player settings and preferences
//!
//! Persisted as JSON, separately from the high score.

use serde::{Deserialize, Serialize};

use crate::platform::storage::KeyValueStore;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
    /// Pause when the window loses focus or the tab is hidden
    pub pause_on_blur: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            pause_on_blur: true,
        }
    }
}

impl Settings {
    /// Storage key
    const STORAGE_KEY: &'static str = "fence_and_fang_settings";

    /// Scale applied to every sound (respects `muted`)
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Load settings, falling back to defaults
    pub fn load(storage: &dyn KeyValueStore) -> Self {
        if let Some(json) = storage.get(Self::STORAGE_KEY) {
            match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings;
                }
                Err(e) => log::info!("Discarding unreadable settings: {e}"),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Load settings; on first run, persist the defaults so they can be edited
    pub fn load_or_init(storage: &mut dyn KeyValueStore) -> Self {
        if storage.get(Self::STORAGE_KEY).is_none() {
            let settings = Self::default();
            settings.save(storage);
            return settings;
        }
        Self::load(storage)
    }

    pub fn save(&self, storage: &mut dyn KeyValueStore) {
        match serde_json::to_string(self) {
            Ok(json) => {
                if storage.set(Self::STORAGE_KEY, &json) {
                    log::info!("Settings saved");
                }
            }
            Err(e) => log::warn!("Failed to serialize settings: {e}"),
        }
    }
}
