//! Mole Rush - a timed whack-a-mole arcade core
//!
//! Core modules:
//! - `sim`: Deterministic match simulation (spawning, lifecycle, scoring)
//! - `difficulty`: Per-tier timing tables
//! - `highscores`: Best score per tier
//! - `settings`: JSON configuration

pub mod difficulty;
pub mod error;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use difficulty::{DifficultyProfile, MsRange, Tier};
pub use error::GameError;
pub use highscores::{BestScoreStore, BestScores, JsonBestScores};
pub use settings::{AutoPlaySettings, Settings};

/// Game configuration constants
pub mod consts {
    /// Number of holes on the board (3x3)
    pub const GRID_SLOTS: usize = 9;
    /// Match length in seconds
    pub const MATCH_SECONDS: u32 = 60;
    /// Countdown period (ms)
    pub const COUNTDOWN_INTERVAL_MS: u64 = 1000;
}
