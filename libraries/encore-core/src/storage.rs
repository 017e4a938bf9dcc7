//! Store traits for playback state
//!
//! Saves are version-checked: a store must reject a `save` whose `version`
//! doesn't match the persisted one with `EncoreError::Conflict`, and return
//! the record with its bumped version on success.

use crate::error::Result;
use crate::types::{Player, Queue, QueueId, UserId};
use async_trait::async_trait;

/// Owns the single playback-state record per user
#[async_trait]
pub trait PlayerStore: Send + Sync {
    /// Get a user's player
    async fn get_player(&self, user_id: &UserId) -> Result<Option<Player>>;

    /// Insert a player if none exists; returns the persisted record
    async fn create_player(&self, player: &Player) -> Result<Player>;

    /// Version-checked update
    async fn save_player(&self, player: &Player) -> Result<Player>;
}

/// Owns queues by opaque id
#[async_trait]
pub trait QueueStore: Send + Sync {
    /// Insert a new queue; returns the persisted record
    async fn create_queue(&self, queue: &Queue) -> Result<Queue>;

    /// Get a queue by ID
    async fn get_queue(&self, id: &QueueId) -> Result<Option<Queue>>;

    /// Version-checked update
    async fn save_queue(&self, queue: &Queue) -> Result<Queue>;

    /// Delete a queue; returns whether it existed
    async fn delete_queue(&self, id: &QueueId) -> Result<bool>;
}

/// Owns each user's queue-reference list (at most two ids, active first)
#[async_trait]
pub trait QueueRefStore: Send + Sync {
    /// Get the user's queue references
    async fn get_queue_refs(&self, user_id: &UserId) -> Result<Vec<QueueId>>;

    /// Replace the user's queue references
    async fn set_queue_refs(&self, user_id: &UserId, refs: &[QueueId]) -> Result<()>;
}
