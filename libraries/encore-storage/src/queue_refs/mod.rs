//! Per-user queue reference list (slot 0 active, slot 1 previous)

use crate::StorageError;
use encore_core::types::{QueueId, UserId};
use sqlx::{Row, SqlitePool};

type Result<T> = std::result::Result<T, StorageError>;

/// Get a user's queue ids, active first
pub async fn get(pool: &SqlitePool, user_id: &UserId) -> Result<Vec<QueueId>> {
    let rows = sqlx::query("SELECT queue_id FROM queue_refs WHERE user_id = ? ORDER BY slot")
        .bind(user_id.as_str())
        .fetch_all(pool)
        .await?;

    Ok(rows
        .iter()
        .map(|row| QueueId::new(row.get::<String, _>("queue_id")))
        .collect())
}

/// Replace a user's queue ids
///
/// Only the first two ids are kept; the slot table rejects anything more.
pub async fn set(pool: &SqlitePool, user_id: &UserId, refs: &[QueueId]) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM queue_refs WHERE user_id = ?")
        .bind(user_id.as_str())
        .execute(&mut *tx)
        .await?;

    for (slot, queue_id) in refs.iter().take(2).enumerate() {
        sqlx::query("INSERT INTO queue_refs (user_id, slot, queue_id) VALUES (?, ?, ?)")
            .bind(user_id.as_str())
            .bind(slot as i64)
            .bind(queue_id.as_str())
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(())
}
