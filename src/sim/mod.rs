//! Deterministic match simulation
//!
//! All gameplay logic lives here:
//! - Logical millisecond clock only (no wall-clock reads)
//! - Injected RNG only
//! - Stable iteration order (by slot index, then timer order)
//! - No rendering, audio or storage dependencies beyond the store trait

pub mod autoplay;
pub mod clock;
pub mod grid;
pub mod rng;
pub mod scheduler;
pub mod scoring;
pub mod session;

pub use autoplay::AutoPlayer;
pub use clock::{TimerId, TimerQueue};
pub use grid::{Grid, Slot, Target, TargetId, TargetKind};
pub use rng::{PcgSource, RandomSource, ScriptedSource};
pub use scheduler::{SpawnScheduler, TimerAction, kind_for_draw};
pub use scoring::{HitOutcome, ScoreBoard, apply_points, combo_bonus, score_hit};
pub use session::{
    ComboBreak, GameEvent, GameObserver, GameSession, SessionConfig, SessionPhase, SessionSummary,
};
