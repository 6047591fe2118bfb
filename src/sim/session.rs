//! Match state machine
//!
//! `NotStarted -> Running -> Ended`. A session owns the grid, the score board,
//! the spawn scheduler and the single timer queue all three timer kinds live
//! in. Everything runs on one logical thread: the caller feeds it time through
//! [`GameSession::advance`] and player input through [`GameSession::trigger`],
//! and each timer callback or trigger is applied to completion before the next
//! one starts.
//!
//! Same-frame ordering: [`GameSession::frame`] applies triggers before firing
//! the timers that came due during the frame, so a trigger and an expiry
//! landing in the same frame resolve as a hit.

use serde::{Deserialize, Serialize};

use super::clock::{TimerId, TimerQueue};
use super::grid::{Grid, TargetId, TargetKind};
use super::rng::{PcgSource, RandomSource};
use super::scheduler::{SpawnScheduler, TimerAction};
use super::scoring::{HitOutcome, ScoreBoard};
use crate::consts::*;
use crate::difficulty::Tier;
use crate::error::Result;
use crate::highscores::{BestScoreStore, BestScores};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    NotStarted,
    Running,
    /// Terminal for this match; `start` begins a new one
    Ended,
}

/// Why a combo went back to zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComboBreak {
    /// A target expired untouched
    Missed,
    /// A bomb was hit
    Bomb,
}

/// Final numbers of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub tier: Tier,
    pub final_score: u32,
    pub max_combo: u32,
    pub is_new_best: bool,
    /// Best score for the tier before this match
    pub previous_best: u32,
}

/// Notifications for presentation (rendering, audio, menus)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Started {
        tier: Tier,
        time_remaining: u32,
    },
    TargetSpawned {
        slot: usize,
        kind: TargetKind,
    },
    TargetExpired {
        slot: usize,
        kind: TargetKind,
    },
    TargetHit {
        slot: usize,
        kind: TargetKind,
        /// Points awarded before the zero clamp (negative for bombs)
        points: i32,
        combo_bonus: u32,
        combo: u32,
        score: u32,
    },
    ComboReset {
        cause: ComboBreak,
    },
    Tick {
        time_remaining: u32,
    },
    SessionEnded(SessionSummary),
}

/// Consumer of [`GameEvent`]s
pub trait GameObserver {
    fn on_event(&mut self, event: &GameEvent);
}

impl<F: FnMut(&GameEvent)> GameObserver for F {
    fn on_event(&mut self, event: &GameEvent) {
        self(event)
    }
}

/// Per-match constants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub match_seconds: u32,
    pub grid_size: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            match_seconds: MATCH_SECONDS,
            grid_size: GRID_SLOTS,
        }
    }
}

pub struct GameSession<R: RandomSource = PcgSource> {
    config: SessionConfig,
    tier: Tier,
    phase: SessionPhase,
    board: ScoreBoard,
    time_remaining: u32,
    grid: Grid,
    scheduler: SpawnScheduler,
    timers: TimerQueue<TimerAction>,
    countdown: Option<TimerId>,
    /// Bumped on every start; timers from older matches are discarded
    epoch: u32,
    rng: R,
    store: Box<dyn BestScoreStore>,
    events: Vec<GameEvent>,
    summary: Option<SessionSummary>,
}

impl GameSession<PcgSource> {
    /// Session with a seeded RNG and an in-memory best-score store
    pub fn seeded(seed: u64) -> Self {
        Self::new(
            PcgSource::new(seed),
            Box::new(BestScores::new()),
            SessionConfig::default(),
        )
    }
}

impl<R: RandomSource> GameSession<R> {
    pub fn new(rng: R, store: Box<dyn BestScoreStore>, config: SessionConfig) -> Self {
        let tier = Tier::default();
        Self {
            config,
            tier,
            phase: SessionPhase::NotStarted,
            board: ScoreBoard::new(),
            time_remaining: config.match_seconds,
            grid: Grid::new(config.grid_size),
            scheduler: SpawnScheduler::new(tier.profile(), 0),
            timers: TimerQueue::new(),
            countdown: None,
            epoch: 0,
            rng,
            store,
            events: Vec::new(),
            summary: None,
        }
    }

    // === Lifecycle ===

    /// Begin a match. Ignored (returns false) while one is already running.
    pub fn start(&mut self, tier: Tier) -> bool {
        if self.phase == SessionPhase::Running {
            log::warn!("start({}) ignored: match already running", tier);
            return false;
        }

        self.timers.cancel_all();
        self.epoch = self.epoch.wrapping_add(1);
        self.tier = tier;
        self.board = ScoreBoard::new();
        self.time_remaining = self.config.match_seconds;
        self.grid.clear();
        self.scheduler = SpawnScheduler::new(tier.profile(), self.epoch);
        self.summary = None;
        self.phase = SessionPhase::Running;

        log::info!(
            "Match started: tier={}, {}s, {} slots",
            tier,
            self.time_remaining,
            self.grid.len()
        );
        self.emit(GameEvent::Started {
            tier,
            time_remaining: self.time_remaining,
        });

        if self.time_remaining == 0 {
            self.end();
            return true;
        }

        self.countdown = Some(
            self.timers
                .schedule(COUNTDOWN_INTERVAL_MS, self.epoch, TimerAction::Countdown),
        );
        // First target goes up right away; later ones follow the spawn interval
        self.spawn();
        true
    }

    /// Begin a match on a tier given by name
    pub fn start_named(&mut self, tier: &str) -> Result<bool> {
        let tier: Tier = tier.parse()?;
        Ok(self.start(tier))
    }

    /// Stop the match: cancel every timer, clear the grid, compare against the
    /// best score and emit the summary. Only acts while running.
    pub fn end(&mut self) -> Option<SessionSummary> {
        if self.phase != SessionPhase::Running {
            log::warn!("end() ignored: phase is {:?}", self.phase);
            return None;
        }
        self.phase = SessionPhase::Ended;

        if let Some(countdown) = self.countdown.take() {
            self.timers.cancel(countdown);
        }
        self.scheduler.cancel_all(&mut self.timers);
        self.timers.cancel_all();
        self.grid.clear();

        let final_score = self.board.score;
        let previous_best = self.store.read(self.tier);
        let is_new_best = final_score > previous_best;
        if is_new_best {
            log::info!(
                "New best for {}: {} (was {})",
                self.tier,
                final_score,
                previous_best
            );
            if let Err(err) = self.store.write(self.tier, final_score) {
                log::warn!("Failed to record best score: {}", err);
            }
        }

        let summary = SessionSummary {
            tier: self.tier,
            final_score,
            max_combo: self.board.max_combo,
            is_new_best,
            previous_best,
        };
        log::info!(
            "Match ended: score={}, max combo={}",
            summary.final_score,
            summary.max_combo
        );
        self.summary = Some(summary);
        self.emit(GameEvent::SessionEnded(summary));
        Some(summary)
    }

    // === Input ===

    /// Player triggered `slot`. Scores only if the slot holds a live target;
    /// anything else (empty slot, already hit, not running) is a no-op.
    pub fn trigger(&mut self, slot: usize) -> Option<HitOutcome> {
        if self.phase != SessionPhase::Running {
            log::debug!("trigger({}) ignored: phase is {:?}", slot, self.phase);
            return None;
        }
        let target = self.grid.take(slot)?;
        self.scheduler.retire(&mut self.timers, target.id);

        let outcome = self.board.hit(target.kind);
        log::debug!(
            "hit {:?} in slot {}: {:+} (combo {})",
            target.kind,
            slot,
            outcome.points,
            outcome.combo_after
        );
        self.emit(GameEvent::TargetHit {
            slot,
            kind: target.kind,
            points: outcome.points,
            combo_bonus: outcome.combo_bonus,
            combo: outcome.combo_after,
            score: self.board.score,
        });
        if outcome.combo_broken {
            self.emit(GameEvent::ComboReset {
                cause: ComboBreak::Bomb,
            });
        }
        Some(outcome)
    }

    // === Time ===

    /// Fire every timer due at or before `now_ms`, in due order
    pub fn advance(&mut self, now_ms: u64) {
        while let Some(fired) = self.timers.pop_due(now_ms) {
            if fired.epoch != self.epoch {
                log::debug!("dropping timer from epoch {}", fired.epoch);
                continue;
            }
            match fired.action {
                TimerAction::Countdown => self.countdown_tick(),
                TimerAction::Spawn => self.spawn(),
                TimerAction::Expire { slot, target } => self.expire(slot, target),
            }
        }
    }

    /// Apply this frame's triggers, then the timers that came due. Returns
    /// how many triggers scored.
    pub fn frame(&mut self, now_ms: u64, triggers: &[usize]) -> usize {
        let hits = triggers
            .iter()
            .filter_map(|&slot| self.trigger(slot))
            .count();
        self.advance(now_ms);
        hits
    }

    fn countdown_tick(&mut self) {
        self.countdown = None;
        if self.phase != SessionPhase::Running {
            return;
        }
        self.time_remaining = self.time_remaining.saturating_sub(1);
        self.emit(GameEvent::Tick {
            time_remaining: self.time_remaining,
        });
        if self.time_remaining == 0 {
            self.end();
        } else {
            self.countdown = Some(self.timers.schedule(
                COUNTDOWN_INTERVAL_MS,
                self.epoch,
                TimerAction::Countdown,
            ));
        }
    }

    fn spawn(&mut self) {
        if self.phase != SessionPhase::Running {
            return;
        }
        if let Some(target) =
            self.scheduler
                .spawn_cycle(&mut self.grid, &mut self.timers, &mut self.rng)
        {
            self.emit(GameEvent::TargetSpawned {
                slot: target.slot,
                kind: target.kind,
            });
        }
    }

    fn expire(&mut self, slot: usize, target: TargetId) {
        if self.phase != SessionPhase::Running {
            return;
        }
        let Some(gone) = self.scheduler.expire(&mut self.grid, slot, target) else {
            return;
        };
        log::debug!("{:?} in slot {} expired", gone.kind, slot);
        self.emit(GameEvent::TargetExpired {
            slot,
            kind: gone.kind,
        });
        if self.board.miss() {
            self.emit(GameEvent::ComboReset {
                cause: ComboBreak::Missed,
            });
        }
    }

    // === Events ===

    fn emit(&mut self, event: GameEvent) {
        log::trace!("{:?}", event);
        self.events.push(event);
    }

    /// Take every event emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Hand pending events to `observer` in emission order
    pub fn dispatch(&mut self, observer: &mut dyn GameObserver) {
        for event in self.events.drain(..) {
            observer.on_event(&event);
        }
    }

    // === Accessors ===

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn score(&self) -> u32 {
        self.board.score
    }

    pub fn combo(&self) -> u32 {
        self.board.combo
    }

    pub fn max_combo(&self) -> u32 {
        self.board.max_combo
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    /// Logical time (ms) the session has been advanced to
    pub fn now(&self) -> u64 {
        self.timers.now()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn active_slots(&self) -> Vec<usize> {
        self.grid.active_slots()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }

    pub fn best_scores(&self) -> &dyn BestScoreStore {
        self.store.as_ref()
    }
}
