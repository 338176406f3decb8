//! Match settings
//!
//! Timing and lane layout for the engine plus the audio preferences the
//! browser host applies. Persisted in LocalStorage on the web.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_LANE_COUNT, POST_FIRE_DELAY_MS, TICK_INTERVAL_MS};
use crate::error::{EngineError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Match ===
    /// Lanes per side
    pub lane_count: usize,
    /// Time between scheduler ticks
    pub tick_interval_ms: u64,
    /// How long a fired beam stays up before resolving
    pub post_fire_delay_ms: u64,
    /// Fixed RNG seed (random per match when unset)
    pub seed: Option<u64>,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            lane_count: DEFAULT_LANE_COUNT,
            tick_interval_ms: TICK_INTERVAL_MS,
            post_fire_delay_ms: POST_FIRE_DELAY_MS,
            seed: None,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// Reject settings the scheduler cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.lane_count == 0 {
            return Err(EngineError::InvalidSettings(
                "lane_count must be at least 1".into(),
            ));
        }
        if self.post_fire_delay_ms == 0 || self.post_fire_delay_ms >= self.tick_interval_ms {
            return Err(EngineError::InvalidSettings(format!(
                "post_fire_delay_ms ({}) must be positive and shorter than tick_interval_ms ({})",
                self.post_fire_delay_ms, self.tick_interval_ms
            )));
        }
        Ok(())
    }

    /// Parse and validate. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Effective sound effects volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume.clamp(0.0, 1.0) * self.sfx_volume.clamp(0.0, 1.0)
        }
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "laser_lanes_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
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
            if let Ok(json) = self.to_json() {
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
