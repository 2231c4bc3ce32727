//! Session settings and preferences
//!
//! Native builds read a JSON file (path from `COSMIC_DEFENDER_SETTINGS`,
//! default `cosmic_defender_settings.json`); web builds use LocalStorage.
//! Missing or malformed settings fall back to defaults.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_PARTICLES;

/// Environment variable naming the settings file
pub const SETTINGS_ENV: &str = "COSMIC_DEFENDER_SETTINGS";

/// Default settings file name
pub const DEFAULT_SETTINGS_PATH: &str = "cosmic_defender_settings.json";

/// Session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Gameplay ===
    /// Shooting intent always on (touch-primary play)
    pub auto_fire: bool,
    /// Fixed RNG seed; random when absent
    pub seed: Option<u64>,
    /// Target frames per second for the frame loop
    pub frame_rate: u32,

    // === Storage ===
    /// Best score file (native only)
    pub best_score_path: String,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === Effects ===
    /// Particle cap; 0 disables particles
    pub max_particles: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_fire: false,
            seed: None,
            frame_rate: 60,

            best_score_path: "cosmic_defender_best.json".to_string(),

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            max_particles: MAX_PARTICLES,
        }
    }
}

impl Settings {
    /// Clamp out-of-range values
    pub fn sanitized(mut self) -> Self {
        self.frame_rate = self.frame_rate.clamp(1, 240);
        self.master_volume = clamp_unit(self.master_volume);
        self.sfx_volume = clamp_unit(self.sfx_volume);
        self.max_particles = self.max_particles.min(MAX_PARTICLES);
        self
    }

    /// Milliseconds per frame at the configured rate
    pub fn frame_interval_ms(&self) -> f64 {
        1000.0 / self.frame_rate.max(1) as f64
    }

    /// Parse settings JSON, falling back to defaults
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Settings>(json) {
            Ok(settings) => settings.sanitized(),
            Err(e) => {
                log::warn!("Invalid settings ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "cosmic_defender_settings";

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
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Settings file path for native builds
    #[cfg(not(target_arch = "wasm32"))]
    pub fn path() -> std::path::PathBuf {
        std::env::var_os(SETTINGS_ENV)
            .map(std::path::PathBuf::from)
            .unwrap_or_else(|| std::path::PathBuf::from(DEFAULT_SETTINGS_PATH))
    }

    /// Load settings from the JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => {
                log::info!("Loaded settings from {}", path.display());
                Self::from_json(&json)
            }
            Err(_) => {
                log::info!("No settings at {}, using defaults", path.display());
                Self::default()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        self.save_to(&Self::path());
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &std::path::Path) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => match std::fs::write(path, json) {
                Ok(()) => log::info!("Settings saved to {}", path.display()),
                Err(e) => log::warn!("Could not save settings: {}", e),
            },
            Err(e) => log::warn!("Could not encode settings: {}", e),
        }
    }
}

fn clamp_unit(v: f32) -> f32 {
    if v.is_finite() { v.clamp(0.0, 1.0) } else { 1.0 }
}
