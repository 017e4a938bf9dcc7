//! Two-slot queue reference list
//!
//! Index 0 is the active queue, index 1 the previously active one. Adding a
//! third reference evicts the oldest; the caller owns deleting the evicted
//! queue before the new list is persisted.

use encore_core::QueueId;
use std::collections::VecDeque;

/// Number of queue references kept per user
pub const QUEUE_SLOTS: usize = 2;

/// A queue reference pushed out of the list
#[must_use = "the evicted queue must be deleted"]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eviction(pub QueueId);

/// Bounded, most-recent-first list of queue references
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueSlots {
    ids: VecDeque<QueueId>,
}

impl QueueSlots {
    /// Rebuild from persisted references; overflow beyond capacity is evicted
    pub fn from_refs(refs: Vec<QueueId>) -> (Self, Vec<Eviction>) {
        let mut ids: VecDeque<QueueId> = refs.into();
        let keep = ids.len().min(QUEUE_SLOTS);
        let overflow = ids
            .drain(keep..)
            .map(Eviction)
            .collect();
        (Self { ids }, overflow)
    }

    /// The active queue
    pub fn active(&self) -> Option<&QueueId> {
        self.ids.front()
    }

    /// The previously active queue
    pub fn previous(&self) -> Option<&QueueId> {
        self.ids.get(1)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &QueueId) -> bool {
        self.ids.contains(id)
    }

    /// Install `id` as the active queue, demoting the current one
    pub fn push_front(&mut self, id: QueueId) -> Option<Eviction> {
        let evicted = if self.ids.len() >= QUEUE_SLOTS {
            self.ids.pop_back().map(Eviction)
        } else {
            None
        };
        self.ids.push_front(id);
        evicted
    }

    /// Swap the active queue for `id`, evicting the old active one
    pub fn replace_head(&mut self, id: QueueId) -> Option<Eviction> {
        let evicted = self.ids.pop_front().map(Eviction);
        self.ids.push_front(id);
        evicted
    }

    /// Drop a reference; returns whether it was present
    pub fn remove(&mut self, id: &QueueId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|existing| existing != id);
        self.ids.len() != before
    }

    /// References in persisted order
    pub fn to_vec(&self) -> Vec<QueueId> {
        self.ids.iter().cloned().collect()
    }
}
