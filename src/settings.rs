//! Game settings
//!
//! Persisted as JSON next to the best scores. Missing fields fall back to
//! their defaults; an unknown tier name is a configuration error.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::difficulty::Tier;
use crate::error::Result;
use crate::sim::SessionConfig;

/// Demo-mode player tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoPlaySettings {
    /// How long a target must be visible before the bot reacts (ms)
    pub reaction_ms: u64,
    /// Leave bombs alone
    pub avoid_bombs: bool,
    /// Logical time between frames (ms)
    pub frame_ms: u64,
}

impl Default for AutoPlaySettings {
    fn default() -> Self {
        Self {
            reaction_ms: 450,
            avoid_bombs: true,
            frame_ms: 16,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Difficulty used when none is picked explicitly
    pub difficulty: Tier,
    /// Match length in seconds
    pub match_seconds: u32,
    /// RNG seed; `None` picks one from the clock
    pub seed: Option<u64>,
    pub autoplay: AutoPlaySettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Tier::Normal,
            match_seconds: MATCH_SECONDS,
            seed: None,
            autoplay: AutoPlaySettings::default(),
        }
    }
}

impl Settings {
    /// Session parameters derived from these settings
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            match_seconds: self.match_seconds,
            grid_size: GRID_SLOTS,
        }
    }

    /// Configured seed, or one derived from the system clock
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0)
        })
    }

    /// Load settings from `path`, or defaults if the file does not exist
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("Using default settings");
            return Ok(Self::default());
        }
        let json = fs::read_to_string(path)?;
        let settings = serde_json::from_str(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
