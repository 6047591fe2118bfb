//! Scoring and combo rules
//!
//! Every function here is total: any kind, any combo and any score produce a
//! defined result, including the zero clamp and the zero-combo bonus.

use serde::{Deserialize, Serialize};

use super::grid::TargetKind;

/// Result of scoring one hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitOutcome {
    /// Points before the combo bonus
    pub base: i32,
    /// Combo bonus added on top of `base`
    pub combo_bonus: u32,
    /// `base + combo_bonus`, may be negative
    pub points: i32,
    pub combo_after: u32,
    /// A non-zero combo was wiped out by this hit
    pub combo_broken: bool,
}

/// Bonus for reaching `combo` consecutive hits: one extra point per three
#[inline]
pub fn combo_bonus(combo: u32) -> u32 {
    if combo > 1 { combo / 3 } else { 0 }
}

/// Score a hit on `kind` given the combo before the hit
pub fn score_hit(kind: TargetKind, combo_before: u32) -> HitOutcome {
    let base = kind.base_points();
    if kind.builds_combo() {
        let combo_after = combo_before.saturating_add(1);
        let bonus = combo_bonus(combo_after);
        HitOutcome {
            base,
            combo_bonus: bonus,
            points: base.saturating_add(bonus.min(i32::MAX as u32) as i32),
            combo_after,
            combo_broken: false,
        }
    } else {
        HitOutcome {
            base,
            combo_bonus: 0,
            points: base,
            combo_after: 0,
            combo_broken: combo_before > 0,
        }
    }
}

/// Add `points` to `score`, clamping at zero
#[inline]
pub fn apply_points(score: u32, points: i32) -> u32 {
    if points >= 0 {
        score.saturating_add(points as u32)
    } else {
        score.saturating_sub(points.unsigned_abs())
    }
}

/// Running score, combo and best combo for one match
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBoard {
    pub score: u32,
    pub combo: u32,
    pub max_combo: u32,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a hit and return how it was scored
    pub fn hit(&mut self, kind: TargetKind) -> HitOutcome {
        let outcome = score_hit(kind, self.combo);
        self.score = apply_points(self.score, outcome.points);
        self.combo = outcome.combo_after;
        self.max_combo = self.max_combo.max(self.combo);
        outcome
    }

    /// A target got away. Returns true if a running combo was reset.
    pub fn miss(&mut self) -> bool {
        if self.combo > 0 {
            self.combo = 0;
            true
        } else {
            false
        }
    }
}
