//! Logical millisecond clock with cancellable one-shot timers
//!
//! Timers fire strictly in `(due, scheduling order)` order, so two timers due
//! at the same millisecond always resolve the same way.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

/// Handle to a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// A timer that came due
#[derive(Debug, Clone, PartialEq)]
pub struct Fired<A> {
    pub id: TimerId,
    pub due: u64,
    pub epoch: u32,
    pub action: A,
}

#[derive(Debug, Clone)]
struct Pending<A> {
    due: u64,
    epoch: u32,
    action: A,
}

#[derive(Debug, Clone)]
pub struct TimerQueue<A> {
    now: u64,
    next_id: u64,
    /// Min-heap of (due, id); ids increase with scheduling order
    order: BinaryHeap<Reverse<(u64, u64)>>,
    /// Live timers; cancelled ones are simply absent
    pending: BTreeMap<u64, Pending<A>>,
}

impl<A> Default for TimerQueue<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> TimerQueue<A> {
    pub fn new() -> Self {
        Self {
            now: 0,
            next_id: 0,
            order: BinaryHeap::new(),
            pending: BTreeMap::new(),
        }
    }

    /// Current logical time (ms)
    #[inline]
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Schedule `action` to fire `delay_ms` from now
    pub fn schedule(&mut self, delay_ms: u64, epoch: u32, action: A) -> TimerId {
        let due = self.now.saturating_add(delay_ms);
        let id = self.next_id;
        self.next_id += 1;
        self.order.push(Reverse((due, id)));
        self.pending.insert(id, Pending { due, epoch, action });
        TimerId(id)
    }

    /// Cancel a timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.pending.remove(&id.0).is_some()
    }

    /// Drop every pending timer
    pub fn cancel_all(&mut self) {
        self.pending.clear();
        self.order.clear();
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.contains_key(&id.0)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Due time of a pending timer
    pub fn due(&self, id: TimerId) -> Option<u64> {
        self.pending.get(&id.0).map(|p| p.due)
    }

    /// Pop the next timer due at or before `until`, moving the clock to its
    /// due time. Returns `None` (and moves the clock to `until`) once nothing
    /// else is due.
    pub fn pop_due(&mut self, until: u64) -> Option<Fired<A>> {
        while let Some(&Reverse((due, id))) = self.order.peek() {
            if due > until {
                break;
            }
            self.order.pop();
            // Skip heap entries whose timer was cancelled
            if let Some(pending) = self.pending.remove(&id) {
                self.now = self.now.max(pending.due);
                return Some(Fired {
                    id: TimerId(id),
                    due: pending.due,
                    epoch: pending.epoch,
                    action: pending.action,
                });
            }
        }
        self.now = self.now.max(until);
        None
    }
}
