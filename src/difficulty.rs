//! Difficulty tiers and their timing tables
//!
//! A tier is chosen once per match and its profile never changes while the
//! match runs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

/// Named difficulty configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Easy, Tier::Normal, Tier::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Easy => "easy",
            Tier::Normal => "normal",
            Tier::Hard => "hard",
        }
    }

    /// Timing table for this tier
    pub fn profile(&self) -> DifficultyProfile {
        match self {
            Tier::Easy => DifficultyProfile {
                spawn_interval: MsRange::new(800, 1800),
                visible_duration: MsRange::new(1200, 2000),
                special_chance: 0.15,
            },
            Tier::Normal => DifficultyProfile {
                spawn_interval: MsRange::new(500, 1500),
                visible_duration: MsRange::new(800, 1500),
                special_chance: 0.2,
            },
            Tier::Hard => DifficultyProfile {
                spawn_interval: MsRange::new(300, 1000),
                visible_duration: MsRange::new(500, 1000),
                special_chance: 0.25,
            },
        }
    }
}

impl FromStr for Tier {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Tier::Easy),
            "normal" => Ok(Tier::Normal),
            "hard" => Ok(Tier::Hard),
            _ => Err(GameError::UnknownTier(s.to_string())),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive millisecond range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsRange {
    pub min: u64,
    pub max: u64,
}

impl MsRange {
    pub const fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn contains(&self, ms: u64) -> bool {
        (self.min..=self.max).contains(&ms)
    }
}

/// Spawn rhythm and special-target odds for one tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    /// Delay between spawn attempts
    pub spawn_interval: MsRange,
    /// How long an untouched target stays up
    pub visible_duration: MsRange,
    /// Probability that a spawned target is a bonus or a bomb
    pub special_chance: f64,
}

impl DifficultyProfile {
    /// Build a custom profile, rejecting inverted ranges and out-of-range odds
    pub fn new(
        spawn_interval: MsRange,
        visible_duration: MsRange,
        special_chance: f64,
    ) -> Result<Self> {
        let profile = Self {
            spawn_interval,
            visible_duration,
            special_chance,
        };
        profile.validate("custom")?;
        Ok(profile)
    }

    /// Look up a tier's profile by name
    pub fn named(name: &str) -> Result<Self> {
        let tier: Tier = name.parse()?;
        Ok(tier.profile())
    }

    pub fn validate(&self, tier: &str) -> Result<()> {
        let invalid = |reason: &str| GameError::InvalidProfile {
            tier: tier.to_string(),
            reason: reason.to_string(),
        };
        if self.spawn_interval.min > self.spawn_interval.max {
            return Err(invalid("spawn interval min exceeds max"));
        }
        if self.visible_duration.min > self.visible_duration.max {
            return Err(invalid("visible duration min exceeds max"));
        }
        if !(0.0..=1.0).contains(&self.special_chance) {
            return Err(invalid("special chance outside [0, 1]"));
        }
        Ok(())
    }

    /// Share of draws that become bombs (always 30% of the special share)
    #[inline]
    pub fn bomb_chance(&self) -> f64 {
        self.special_chance * 0.3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_profiles_are_valid() {
        for tier in Tier::ALL {
            tier.profile().validate(tier.as_str()).unwrap();
        }
    }

    #[test]
    fn test_tier_parse() {
        assert_eq!("easy".parse::<Tier>().unwrap(), Tier::Easy);
        assert_eq!(" HARD ".parse::<Tier>().unwrap(), Tier::Hard);
        assert!(matches!(
            "nightmare".parse::<Tier>(),
            Err(GameError::UnknownTier(name)) if name == "nightmare"
        ));
    }

    #[test]
    fn test_named_lookup() {
        let normal = DifficultyProfile::named("normal").unwrap();
        assert_eq!(normal.spawn_interval, MsRange::new(500, 1500));
        assert_eq!(normal.visible_duration, MsRange::new(800, 1500));
        assert!(DifficultyProfile::named("").is_err());
    }

    #[test]
    fn test_harder_tiers_are_faster() {
        let easy = Tier::Easy.profile();
        let hard = Tier::Hard.profile();
        assert!(hard.spawn_interval.max < easy.spawn_interval.max);
        assert!(hard.visible_duration.max < easy.visible_duration.max);
        assert!(hard.special_chance > easy.special_chance);
    }

    #[test]
    fn test_invalid_profiles_rejected() {
        assert!(DifficultyProfile::new(MsRange::new(10, 5), MsRange::new(1, 2), 0.1).is_err());
        assert!(DifficultyProfile::new(MsRange::new(1, 5), MsRange::new(3, 2), 0.1).is_err());
        assert!(DifficultyProfile::new(MsRange::new(1, 5), MsRange::new(1, 2), 1.5).is_err());
        assert!(DifficultyProfile::new(MsRange::new(5, 5), MsRange::new(2, 2), 1.0).is_ok());
    }

    #[test]
    fn test_tier_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Tier::Hard).unwrap(), "\"hard\"");
        assert!(serde_json::from_str::<Tier>("\"insane\"").is_err());
    }
}
