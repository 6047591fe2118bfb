//! Error types
//!
//! Only configuration and storage failures are errors. Gameplay edge cases
//! (triggering an empty slot, starting twice, a full grid) are total and never
//! produce one.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    /// Difficulty name that is not one of `easy`, `normal`, `hard`
    #[error("unknown difficulty tier `{0}` (expected easy, normal or hard)")]
    UnknownTier(String),
    /// A difficulty profile whose ranges or chances are out of bounds
    #[error("invalid profile for tier `{tier}`: {reason}")]
    InvalidProfile { tier: String, reason: String },
    #[error("storage i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
