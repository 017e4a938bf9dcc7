//! Play history: one record per context started

use crate::StorageError;
use encore_core::types::{Context, UserId};
use sqlx::{Row, SqlitePool};

type Result<T> = std::result::Result<T, StorageError>;

/// A stored play-history entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayHistoryEntry {
    pub user_id: UserId,
    pub context: Context,
    pub played_at: i64,
}

/// Append a record for `context`
pub async fn record(pool: &SqlitePool, user_id: &UserId, context: &Context) -> Result<()> {
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "INSERT INTO play_history (user_id, context_type, context_id, played_at)
         VALUES (?, ?, ?, ?)",
    )
    .bind(user_id.as_str())
    .bind(context.kind())
    .bind(context.id())
    .bind(now)
    .execute(pool)
    .await?;

    Ok(())
}

/// Most recent entries first
pub async fn list_for_user(
    pool: &SqlitePool,
    user_id: &UserId,
    limit: usize,
) -> Result<Vec<PlayHistoryEntry>> {
    let rows = sqlx::query(
        "SELECT user_id, context_type, context_id, played_at FROM play_history
         WHERE user_id = ? ORDER BY played_at DESC, id DESC LIMIT ?",
    )
    .bind(user_id.as_str())
    .bind(limit as i64)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| PlayHistoryEntry {
            user_id: UserId::new(row.get::<String, _>("user_id")),
            context: Context::from_parts(
                &row.get::<String, _>("context_type"),
                row.get::<Option<String>, _>("context_id").as_deref(),
            ),
            played_at: row.get("played_at"),
        })
        .collect())
}
