//! Demo mode - a simple bot plays the match
//!
//! The bot reacts to the oldest visible target once it has been up for its
//! reaction time, one trigger per frame, optionally leaving bombs alone.

use super::grid::TargetKind;
use super::rng::RandomSource;
use super::session::{GameSession, SessionSummary};
use crate::difficulty::Tier;
use crate::settings::AutoPlaySettings;

#[derive(Debug, Clone, Copy)]
pub struct AutoPlayer {
    pub reaction_ms: u64,
    pub avoid_bombs: bool,
}

impl From<AutoPlaySettings> for AutoPlayer {
    fn from(settings: AutoPlaySettings) -> Self {
        Self {
            reaction_ms: settings.reaction_ms,
            avoid_bombs: settings.avoid_bombs,
        }
    }
}

impl AutoPlayer {
    /// Slots to trigger at logical time `now_ms`
    pub fn choose<R: RandomSource>(&self, session: &GameSession<R>, now_ms: u64) -> Vec<usize> {
        session
            .grid()
            .targets()
            .filter(|t| !(self.avoid_bombs && t.kind == TargetKind::Bomb))
            .filter(|t| now_ms.saturating_sub(t.spawned_at) >= self.reaction_ms)
            .min_by_key(|t| (t.spawned_at, t.slot))
            .map(|t| vec![t.slot])
            .unwrap_or_default()
    }

    /// Play a whole match on logical time, `frame_ms` per frame
    pub fn play<R: RandomSource>(
        &self,
        session: &mut GameSession<R>,
        tier: Tier,
        frame_ms: u64,
    ) -> Option<SessionSummary> {
        if !session.start(tier) {
            return None;
        }
        let frame_ms = frame_ms.max(1);
        let mut now = session.now();
        while session.is_running() {
            now += frame_ms;
            let triggers = self.choose(session, now);
            session.frame(now, &triggers);
        }
        session.summary().copied()
    }
}
