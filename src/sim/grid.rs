//! Slot/target table
//!
//! A slot holds at most one target and a target lives in exactly one slot.
//! The grid is the only place targets are stored, so both halves of that
//! invariant are enforced here.

use serde::{Deserialize, Serialize};

/// Target kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetKind {
    Normal,
    /// Worth extra points
    Bonus,
    /// Penalty target: costs points and breaks the combo
    Bomb,
}

impl TargetKind {
    /// Points for a hit, before any combo bonus
    pub fn base_points(&self) -> i32 {
        match self {
            TargetKind::Normal => 1,
            TargetKind::Bonus => 5,
            TargetKind::Bomb => -3,
        }
    }

    #[inline]
    pub fn builds_combo(&self) -> bool {
        !matches!(self, TargetKind::Bomb)
    }
}

/// Unique per spawned target within a session
pub type TargetId = u64;

/// An active target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub id: TargetId,
    pub kind: TargetKind,
    pub slot: usize,
    /// Logical ms when it appeared
    pub spawned_at: u64,
    /// Logical ms when it will disappear if not hit
    pub expires_at: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub index: usize,
    pub occupant: Option<Target>,
}

impl Slot {
    #[inline]
    pub fn is_vacant(&self) -> bool {
        self.occupant.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    slots: Vec<Slot>,
}

impl Grid {
    pub fn new(size: usize) -> Self {
        Self {
            slots: (0..size)
                .map(|index| Slot {
                    index,
                    occupant: None,
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn get(&self, index: usize) -> Option<&Target> {
        self.slots.get(index).and_then(|s| s.occupant.as_ref())
    }

    /// Indices of unoccupied slots, ascending
    pub fn vacant(&self) -> Vec<usize> {
        self.slots
            .iter()
            .filter(|s| s.is_vacant())
            .map(|s| s.index)
            .collect()
    }

    /// Indices of occupied slots, ascending
    pub fn active_slots(&self) -> Vec<usize> {
        self.slots
            .iter()
            .filter(|s| !s.is_vacant())
            .map(|s| s.index)
            .collect()
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| !s.is_vacant()).count()
    }

    pub fn targets(&self) -> impl Iterator<Item = &Target> {
        self.slots.iter().filter_map(|s| s.occupant.as_ref())
    }

    /// Place a target in its slot. Refuses (returns false) if the slot is out
    /// of range or already occupied, or if the target id is already placed.
    pub fn place(&mut self, target: Target) -> bool {
        if self.targets().any(|t| t.id == target.id) {
            return false;
        }
        match self.slots.get_mut(target.slot) {
            Some(slot) if slot.is_vacant() => {
                slot.occupant = Some(target);
                true
            }
            _ => false,
        }
    }

    /// Remove and return whatever occupies `index`
    pub fn take(&mut self, index: usize) -> Option<Target> {
        self.slots.get_mut(index).and_then(|s| s.occupant.take())
    }

    /// Remove the target at `index` only if it is the instance `id`
    pub fn take_if(&mut self, index: usize, id: TargetId) -> Option<Target> {
        match self.get(index) {
            Some(target) if target.id == id => self.take(index),
            _ => None,
        }
    }

    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.occupant = None;
        }
    }
}
