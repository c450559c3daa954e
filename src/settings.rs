//! Runner settings
//!
//! Stored as JSON next to the leaderboard on native builds and in
//! LocalStorage on the web. Missing fields take their defaults.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Environment variable that pins the RNG seed
pub const SEED_ENV_VAR: &str = "SPACE_KILLER_SEED";

/// How the headless runner steers the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Autopilot {
    /// Stand still and never fire
    Off,
    /// Walk wall to wall, firing whenever possible
    Sweep,
    /// Line up under the nearest target and dodge incoming fire
    #[default]
    Hunter,
}

impl Autopilot {
    pub fn as_str(&self) -> &'static str {
        match self {
            Autopilot::Off => "off",
            Autopilot::Sweep => "sweep",
            Autopilot::Hunter => "hunter",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "off" | "none" => Some(Autopilot::Off),
            "sweep" => Some(Autopilot::Sweep),
            "hunter" | "hunt" => Some(Autopilot::Hunter),
            _ => None,
        }
    }
}

/// Session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Pins the RNG; a fresh entropy seed is drawn when unset
    pub seed: Option<u64>,
    /// Native leaderboard file
    pub leaderboard_path: PathBuf,
    pub autopilot: Autopilot,
    /// Runner stops after this many ticks even if the run is still going
    pub max_ticks: u64,
    /// Name given to a run that makes the leaderboard
    pub player_name: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            leaderboard_path: PathBuf::from("space_killer_highscores.json"),
            autopilot: Autopilot::default(),
            max_ticks: 20_000,
            player_name: None,
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "space-killer-settings";

    /// Override fields from the environment
    pub fn apply_env(&mut self) {
        let Ok(raw) = std::env::var(SEED_ENV_VAR) else {
            return;
        };
        match raw.trim().parse::<u64>() {
            Ok(seed) => self.seed = Some(seed),
            Err(_) => log::warn!("Ignoring {}={:?}: not a u64", SEED_ENV_VAR, raw),
        }
    }

    /// Configured seed, or a fresh one from the platform
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(crate::platform::entropy_seed)
    }

    /// Load settings from a JSON file, falling back to defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Bad settings file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings as JSON
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(
        &self,
        path: &std::path::Path,
    ) -> Result<(), crate::persistence::PersistenceError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
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
    pub fn save(&self) -> Result<(), crate::persistence::PersistenceError> {
        use crate::persistence::PersistenceError;

        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| PersistenceError::Storage("LocalStorage unavailable".into()))?;
        let json = serde_json::to_string(self)?;
        storage
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|e| PersistenceError::Storage(format!("{:?}", e)))?;
        log::info!("Settings saved");
        Ok(())
    }
}
