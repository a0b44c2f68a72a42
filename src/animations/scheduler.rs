//! Deferred style transitions on a virtual clock
//!
//! The overlay never blocks on a transition. Work that must happen "a little
//! later" (starting an entrance, tinting the backdrop, hiding a dismissed
//! dialog) is queued here with a delay and handed back to the caller once the
//! clock has advanced past its due time. Entries are keyed by dialog so they
//! can be inspected or cancelled per dialog.

use crate::dialogs::DialogId;
use crate::document::{NodeId, StylePatch};
use std::time::Duration;
use tracing::trace;

/// What a deferred transition is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    /// Frame entrance started by a show hook
    Entrance,
    /// Backdrop tint fade-in
    Backdrop,
    /// Removal from layout after an exit transition
    Hide,
    /// Anything else a behavior schedules
    Custom,
}

/// Unique, monotonically assigned identifier of a scheduled transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransitionId(u64);

/// A style patch waiting for its due time
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledTransition {
    pub id: TransitionId,
    pub key: DialogId,
    pub kind: TransitionKind,
    /// Absolute due time on the scheduler clock
    pub due: Duration,
    pub node: NodeId,
    pub patch: StylePatch,
}

#[derive(Debug, Default)]
pub struct TransitionScheduler {
    now: Duration,
    next_id: u64,
    pending: Vec<ScheduledTransition>,
}

impl TransitionScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current clock value
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Queue `patch` for `node`, due `delay` from now
    pub fn schedule(
        &mut self,
        key: &DialogId,
        kind: TransitionKind,
        delay: Duration,
        node: NodeId,
        patch: StylePatch,
    ) -> TransitionId {
        let id = TransitionId(self.next_id);
        self.next_id += 1;

        let due = self.now + delay;
        trace!("Scheduling {:?} for {} at {:?}", kind, key, due);

        self.pending.push(ScheduledTransition {
            id,
            key: key.clone(),
            kind,
            due,
            node,
            patch,
        });
        id
    }

    /// Advance the clock and return every transition that became due, in due
    /// order (scheduling order among equal due times)
    pub fn advance(&mut self, elapsed: Duration) -> Vec<ScheduledTransition> {
        self.now += elapsed;
        let now = self.now;

        let (mut due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|transition| transition.due <= now);
        self.pending = pending;

        due.sort_by_key(|transition| (transition.due, transition.id));
        due
    }

    /// Time until the earliest pending transition, if any
    pub fn next_due(&self) -> Option<Duration> {
        self.pending
            .iter()
            .map(|transition| transition.due.saturating_sub(self.now))
            .min()
    }

    /// Drop pending transitions of `kind` for `key`; returns how many were dropped
    pub fn cancel(&mut self, key: &DialogId, kind: TransitionKind) -> usize {
        let before = self.pending.len();
        self.pending
            .retain(|transition| !(transition.key == *key && transition.kind == kind));
        before - self.pending.len()
    }

    pub fn has_pending(&self, key: &DialogId, kind: TransitionKind) -> bool {
        self.pending
            .iter()
            .any(|transition| transition.key == *key && transition.kind == kind)
    }

    pub fn pending_for<'a>(&'a self, key: &'a DialogId) -> impl Iterator<Item = &'a ScheduledTransition> + 'a {
        self.pending.iter().filter(move |transition| transition.key == *key)
    }
}
