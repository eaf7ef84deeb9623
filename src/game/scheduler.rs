//! Deferred, cancelable engine actions on a virtual clock
//!
//! Feedback delays (match refill, mismatch flash, completion) are queued
//! here instead of firing from free-standing callbacks. The engine owns the
//! scheduler, so tearing the engine down or resetting the session drops every
//! pending action with it.

use crate::core::PairId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Actions the engine defers behind a feedback delay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeferredAction {
    /// Remove a matched pair and draw the next one
    RefillBoard { pair_id: PairId },
    /// End the mismatch flash and release the selection
    ClearMismatch,
    /// Move from the game screen to the reflection screen
    CompleteGame,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Deferred {
    due: Duration,
    seq: u64,
    action: DeferredAction,
}

/// Queue of deferred actions ordered by due time, then insertion order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scheduler {
    now: Duration,
    next_seq: u64,
    /// Bumped on every cancel so drivers can notice a reset
    generation: u64,
    pending: Vec<Deferred>,
}

impl Scheduler {
    pub fn new() -> Self {
        Scheduler::default()
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Queue an action to fire `delay` after the current virtual time
    pub fn schedule(&mut self, delay: Duration, action: DeferredAction) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Deferred {
            due: self.now + delay,
            seq,
            action,
        });
    }

    /// Drop every pending action, returning how many were dropped
    pub fn cancel_all(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        self.generation += 1;
        dropped
    }

    /// Absolute virtual time of the earliest pending action
    pub fn next_due(&self) -> Option<Duration> {
        self.pending.iter().map(|d| d.due).min()
    }

    /// Time left until the earliest pending action fires
    pub fn time_until_next(&self) -> Option<Duration> {
        self.next_due().map(|due| due.saturating_sub(self.now))
    }

    /// Remove and return the earliest action due at or before `until`
    ///
    /// The clock moves forward to the due time of the returned action, so
    /// anything it schedules is timed from the moment it fired.
    pub fn pop_due(&mut self, until: Duration) -> Option<DeferredAction> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, d)| d.due <= until)
            .min_by_key(|(_, d)| (d.due, d.seq))
            .map(|(i, _)| i)?;
        let deferred = self.pending.remove(idx);
        if deferred.due > self.now {
            self.now = deferred.due;
        }
        Some(deferred.action)
    }

    /// Move the clock forward; never moves it back
    pub fn advance_to(&mut self, t: Duration) {
        if t > self.now {
            self.now = t;
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Is an action of this kind pending?
    pub fn has_pending(&self, pred: impl Fn(&DeferredAction) -> bool) -> bool {
        self.pending.iter().any(|d| pred(&d.action))
    }
}
