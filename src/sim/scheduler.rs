//! Spawn scheduler
//!
//! Keeps the rhythm of targets popping up and going away. Two independent
//! clocks run per cycle: the delay until the next spawn attempt and the
//! lifetime of the target just spawned. Both are plain timers in the session's
//! [`TimerQueue`], and the scheduler keeps the handles so everything can be
//! cancelled at once.

use std::collections::BTreeMap;

use super::clock::{TimerId, TimerQueue};
use super::grid::{Grid, Target, TargetId, TargetKind};
use super::rng::RandomSource;
use crate::difficulty::DifficultyProfile;

/// Everything that can sit in a session's timer queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    /// One-second countdown
    Countdown,
    /// Next spawn attempt
    Spawn,
    /// Lifetime of target `target` in `slot` ran out
    Expire { slot: usize, target: TargetId },
}

/// Pick a kind from one uniform draw `r` in `[0, 1)`
pub fn kind_for_draw(profile: &DifficultyProfile, r: f64) -> TargetKind {
    if r < profile.bomb_chance() {
        TargetKind::Bomb
    } else if r < profile.special_chance {
        TargetKind::Bonus
    } else {
        TargetKind::Normal
    }
}

#[derive(Debug, Clone)]
pub struct SpawnScheduler {
    profile: DifficultyProfile,
    epoch: u32,
    next_spawn: Option<TimerId>,
    /// Expiry timer per live target
    expiries: BTreeMap<TargetId, TimerId>,
    next_target_id: TargetId,
}

impl SpawnScheduler {
    pub fn new(profile: DifficultyProfile, epoch: u32) -> Self {
        Self {
            profile,
            epoch,
            next_spawn: None,
            expiries: BTreeMap::new(),
            next_target_id: 1,
        }
    }

    pub fn profile(&self) -> &DifficultyProfile {
        &self.profile
    }

    /// A spawn attempt is pending
    pub fn is_armed(&self) -> bool {
        self.next_spawn.is_some()
    }

    pub fn pending_expiries(&self) -> usize {
        self.expiries.len()
    }

    /// Uniformly random vacant slot, or `None` when the grid is full
    pub fn choose_slot(grid: &Grid, rng: &mut dyn RandomSource) -> Option<usize> {
        let vacant = grid.vacant();
        if vacant.is_empty() {
            return None;
        }
        Some(vacant[rng.index(vacant.len())])
    }

    pub fn choose_kind(profile: &DifficultyProfile, rng: &mut dyn RandomSource) -> TargetKind {
        kind_for_draw(profile, rng.unit())
    }

    /// Arm the next spawn attempt after a delay drawn from the spawn interval
    pub fn schedule_next_spawn(
        &mut self,
        timers: &mut TimerQueue<TimerAction>,
        rng: &mut dyn RandomSource,
    ) -> TimerId {
        if let Some(previous) = self.next_spawn.take() {
            timers.cancel(previous);
        }
        let range = self.profile.spawn_interval;
        let delay = rng.between(range.min, range.max);
        let id = timers.schedule(delay, self.epoch, TimerAction::Spawn);
        self.next_spawn = Some(id);
        id
    }

    /// One spawn cycle: place a target if a slot is free, arm its expiry, then
    /// arm the next cycle whether or not anything spawned.
    pub fn spawn_cycle(
        &mut self,
        grid: &mut Grid,
        timers: &mut TimerQueue<TimerAction>,
        rng: &mut dyn RandomSource,
    ) -> Option<Target> {
        // The timer that brought us here (if any) has fired
        self.next_spawn = None;

        let spawned = match Self::choose_slot(grid, rng) {
            Some(slot) => {
                let kind = Self::choose_kind(&self.profile, rng);
                let range = self.profile.visible_duration;
                let lifetime = rng.between(range.min, range.max);
                let now = timers.now();
                let target = Target {
                    id: self.next_target_id,
                    kind,
                    slot,
                    spawned_at: now,
                    expires_at: now + lifetime,
                };
                self.next_target_id += 1;

                if grid.place(target) {
                    let expiry = timers.schedule(
                        lifetime,
                        self.epoch,
                        TimerAction::Expire {
                            slot,
                            target: target.id,
                        },
                    );
                    self.expiries.insert(target.id, expiry);
                    log::debug!("spawned {:?} in slot {} for {}ms", kind, slot, lifetime);
                    Some(target)
                } else {
                    None
                }
            }
            None => {
                log::debug!("grid full, skipping spawn");
                None
            }
        };

        self.schedule_next_spawn(timers, rng);
        spawned
    }

    /// Expiry timer fired. Removes the target if that same instance is still
    /// up; a stale expiry for a slot that has since been reused does nothing.
    pub fn expire(&mut self, grid: &mut Grid, slot: usize, target: TargetId) -> Option<Target> {
        self.expiries.remove(&target);
        grid.take_if(slot, target)
    }

    /// Target was hit: its expiry must never fire
    pub fn retire(&mut self, timers: &mut TimerQueue<TimerAction>, target: TargetId) {
        if let Some(expiry) = self.expiries.remove(&target) {
            timers.cancel(expiry);
        }
    }

    /// Cancel the pending spawn and every pending expiry
    pub fn cancel_all(&mut self, timers: &mut TimerQueue<TimerAction>) {
        if let Some(spawn) = self.next_spawn.take() {
            timers.cancel(spawn);
        }
        for (_, expiry) in std::mem::take(&mut self.expiries) {
            timers.cancel(expiry);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::difficulty::{MsRange, Tier};
    use crate::sim::rng::{PcgSource, ScriptedSource};
    use proptest::prelude::*;

    fn profile() -> DifficultyProfile {
        DifficultyProfile::new(MsRange::new(500, 1500), MsRange::new(800, 1500), 0.2).unwrap()
    }

    #[test]
    fn test_kind_thresholds() {
        let p = profile();
        // bomb below 0.06, bonus below 0.2, normal otherwise
        assert_eq!(kind_for_draw(&p, 0.0), TargetKind::Bomb);
        assert_eq!(kind_for_draw(&p, 0.059), TargetKind::Bomb);
        assert_eq!(kind_for_draw(&p, 0.061), TargetKind::Bonus);
        assert_eq!(kind_for_draw(&p, 0.199), TargetKind::Bonus);
        assert_eq!(kind_for_draw(&p, 0.2), TargetKind::Normal);
        assert_eq!(kind_for_draw(&p, 0.99), TargetKind::Normal);
    }

    #[test]
    fn test_no_specials_when_chance_zero() {
        let p = DifficultyProfile::new(MsRange::new(1, 1), MsRange::new(1, 1), 0.0).unwrap();
        assert_eq!(kind_for_draw(&p, 0.0), TargetKind::Normal);
    }

    #[test]
    fn test_choose_slot_only_vacant() {
        let mut grid = Grid::new(3);
        let mut rng = ScriptedSource::new([0.0]);
        for (id, slot) in [(1, 0), (2, 2)] {
            grid.place(Target {
                id,
                kind: TargetKind::Normal,
                slot,
                spawned_at: 0,
                expires_at: 0,
            });
        }
        assert_eq!(SpawnScheduler::choose_slot(&grid, &mut rng), Some(1));
        grid.take(2);
        let mut rng = ScriptedSource::new([0.9]);
        assert_eq!(SpawnScheduler::choose_slot(&grid, &mut rng), Some(2));
    }

    #[test]
    fn test_choose_slot_full_grid() {
        let mut grid = Grid::new(2);
        let mut rng = PcgSource::new(1);
        let mut timers = TimerQueue::new();
        let mut scheduler = SpawnScheduler::new(profile(), 0);
        assert!(scheduler.spawn_cycle(&mut grid, &mut timers, &mut rng).is_some());
        assert!(scheduler.spawn_cycle(&mut grid, &mut timers, &mut rng).is_some());
        assert_eq!(SpawnScheduler::choose_slot(&grid, &mut rng), None);

        // Full grid: skip, but still reschedule
        assert!(scheduler.spawn_cycle(&mut grid, &mut timers, &mut rng).is_none());
        assert!(scheduler.is_armed());
        assert_eq!(scheduler.pending_expiries(), 2);
    }

    #[test]
    fn test_spawn_cycle_arms_expiry_and_next_spawn() {
        let mut grid = Grid::new(9);
        // slot draw, kind draw, lifetime draw, interval draw
        let mut rng = ScriptedSource::new([0.5, 0.9, 0.0, 0.0]);
        let mut timers = TimerQueue::new();
        let mut scheduler = SpawnScheduler::new(profile(), 4);

        let target = scheduler.spawn_cycle(&mut grid, &mut timers, &mut rng).unwrap();
        assert_eq!(target.slot, 4);
        assert_eq!(target.kind, TargetKind::Normal);
        assert_eq!(target.expires_at, 800);
        assert_eq!(timers.len(), 2);

        let first = timers.pop_due(u64::MAX).unwrap();
        assert_eq!(first.action, TimerAction::Spawn);
        assert_eq!(first.due, 500);
        assert_eq!(first.epoch, 4);
        let second = timers.pop_due(u64::MAX).unwrap();
        assert_eq!(
            second.action,
            TimerAction::Expire {
                slot: 4,
                target: target.id
            }
        );
    }

    #[test]
    fn test_retire_cancels_expiry() {
        let mut grid = Grid::new(9);
        let mut rng = PcgSource::new(3);
        let mut timers = TimerQueue::new();
        let mut scheduler = SpawnScheduler::new(profile(), 0);
        let target = scheduler.spawn_cycle(&mut grid, &mut timers, &mut rng).unwrap();
        scheduler.retire(&mut timers, target.id);
        assert_eq!(scheduler.pending_expiries(), 0);
        assert_eq!(timers.len(), 1);
    }

    #[test]
    fn test_stale_expiry_is_ignored() {
        let mut grid = Grid::new(9);
        let mut scheduler = SpawnScheduler::new(profile(), 0);
        grid.place(Target {
            id: 9,
            kind: TargetKind::Bonus,
            slot: 1,
            spawned_at: 0,
            expires_at: 10,
        });
        assert!(scheduler.expire(&mut grid, 1, 8).is_none());
        assert_eq!(grid.get(1).map(|t| t.id), Some(9));
    }

    #[test]
    fn test_cancel_all() {
        let mut grid = Grid::new(9);
        let mut rng = PcgSource::new(5);
        let mut timers = TimerQueue::new();
        let mut scheduler = SpawnScheduler::new(Tier::Hard.profile(), 0);
        for _ in 0..4 {
            scheduler.spawn_cycle(&mut grid, &mut timers, &mut rng);
        }
        scheduler.cancel_all(&mut timers);
        assert!(timers.is_empty());
        assert!(!scheduler.is_armed());
        assert_eq!(scheduler.pending_expiries(), 0);
    }

    proptest! {
        #[test]
        fn prop_spawns_never_overwrite(seed in any::<u64>(), cycles in 1usize..60) {
            let mut grid = Grid::new(9);
            let mut rng = PcgSource::new(seed);
            let mut timers = TimerQueue::new();
            let mut scheduler = SpawnScheduler::new(Tier::Hard.profile(), 0);
            let mut placed = 0usize;
            for _ in 0..cycles {
                let before = grid.active_count();
                if let Some(target) = scheduler.spawn_cycle(&mut grid, &mut timers, &mut rng) {
                    prop_assert_eq!(grid.active_count(), before + 1);
                    prop_assert_eq!(grid.get(target.slot).map(|t| t.id), Some(target.id));
                    prop_assert!(Tier::Hard.profile().visible_duration.contains(target.expires_at - target.spawned_at));
                    placed += 1;
                } else {
                    prop_assert_eq!(before, 9);
                }
            }
            prop_assert_eq!(grid.active_count(), placed.min(9));
        }

        #[test]
        fn prop_bombs_are_subset_of_specials(chance in 0.0f64..=1.0, r in 0.0f64..1.0) {
            let p = DifficultyProfile::new(MsRange::new(1, 2), MsRange::new(1, 2), chance).unwrap();
            let kind = kind_for_draw(&p, r);
            if r >= chance {
                prop_assert_eq!(kind, TargetKind::Normal);
            }
            if kind == TargetKind::Bomb {
                prop_assert!(r < chance * 0.3);
            }
        }
    }
}
