//! User preferences
//!
//! Persisted as JSON next to the high score, through the same storage
//! backends. Missing or unreadable settings fall back to defaults.

use serde::{Deserialize, Serialize};

use crate::persistence::{SETTINGS_KEY, Storage, load_json, save_json};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
    /// Play the formation's marching beat
    pub march_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            march_enabled: true,
        }
    }
}

impl Settings {
    /// Set master volume (clamped to 0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (clamped to 0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    /// Volume actually applied to effects
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Load from storage, defaults on any failure
    pub fn load(storage: &dyn Storage) -> Self {
        match load_json::<Settings>(storage, SETTINGS_KEY) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings");
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Could not load settings, using defaults: {e}");
                Self::default()
            }
        }
    }

    /// Best-effort save
    pub fn save(&self, storage: &mut dyn Storage) {
        match save_json(storage, SETTINGS_KEY, self) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Could not save settings: {e}"),
        }
    }
}
