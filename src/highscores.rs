//! Best score per difficulty tier
//!
//! The session only needs [`BestScoreStore::read`] and
//! [`BestScoreStore::write`]; where the numbers live is up to the caller.
//! [`BestScores`] keeps them in memory and [`JsonBestScores`] mirrors them to a
//! JSON file.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::difficulty::Tier;
use crate::error::Result;

pub trait BestScoreStore {
    /// Best recorded score for `tier` (0 if none)
    fn read(&self, tier: Tier) -> u32;
    /// Record a new best for `tier`
    fn write(&mut self, tier: Tier, score: u32) -> Result<()>;
}

/// In-memory best scores
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestScores {
    pub entries: BTreeMap<Tier, u32>,
}

impl BestScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// A score beats the current best for its tier
    pub fn qualifies(&self, tier: Tier, score: u32) -> bool {
        score > self.best(tier)
    }

    pub fn best(&self, tier: Tier) -> u32 {
        self.entries.get(&tier).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl BestScoreStore for BestScores {
    fn read(&self, tier: Tier) -> u32 {
        self.best(tier)
    }

    fn write(&mut self, tier: Tier, score: u32) -> Result<()> {
        self.entries.insert(tier, score);
        Ok(())
    }
}

/// Best scores persisted as pretty JSON at `path`
#[derive(Debug, Clone)]
pub struct JsonBestScores {
    path: PathBuf,
    scores: BestScores,
}

impl JsonBestScores {
    /// Load from `path`. A missing file starts fresh; a corrupt one is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let scores = if path.exists() {
            let json = fs::read_to_string(&path)?;
            let scores: BestScores = serde_json::from_str(&json)?;
            log::info!("Loaded best scores for {} tiers", scores.entries.len());
            scores
        } else {
            log::info!("No best scores at {}, starting fresh", path.display());
            BestScores::new()
        };
        Ok(Self { path, scores })
    }

    pub fn scores(&self) -> &BestScores {
        &self.scores
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.scores)?;
        fs::write(&self.path, json)?;
        log::info!("Best scores saved to {}", self.path.display());
        Ok(())
    }
}

impl BestScoreStore for JsonBestScores {
    fn read(&self, tier: Tier) -> u32 {
        self.scores.best(tier)
    }

    fn write(&mut self, tier: Tier, score: u32) -> Result<()> {
        self.scores.write(tier, score)?;
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("mole-rush-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn test_empty_store_reads_zero() {
        let scores = BestScores::new();
        for tier in Tier::ALL {
            assert_eq!(scores.read(tier), 0);
        }
        assert!(!scores.qualifies(Tier::Easy, 0));
        assert!(scores.qualifies(Tier::Easy, 1));
    }

    #[test]
    fn test_tiers_are_independent() {
        let mut scores = BestScores::new();
        scores.write(Tier::Hard, 40).unwrap();
        assert_eq!(scores.read(Tier::Hard), 40);
        assert_eq!(scores.read(Tier::Normal), 0);
        assert!(!scores.qualifies(Tier::Hard, 40));
        assert!(scores.qualifies(Tier::Hard, 41));
    }

    #[test]
    fn test_json_store_round_trip() {
        let path = temp_path("roundtrip");
        let _ = fs::remove_file(&path);

        let mut store = JsonBestScores::load(&path).unwrap();
        assert!(store.scores().is_empty());
        store.write(Tier::Normal, 57).unwrap();

        let reloaded = JsonBestScores::load(&path).unwrap();
        assert_eq!(reloaded.read(Tier::Normal), 57);
        assert_eq!(reloaded.read(Tier::Easy), 0);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_json_store_rejects_corrupt_file() {
        let path = temp_path("corrupt");
        fs::write(&path, "{not json").unwrap();
        assert!(JsonBestScores::load(&path).is_err());
        let _ = fs::remove_file(&path);
    }
}
