//! Queue documents
//!
//! Track lists and shuffle orders are stored as JSON columns; a queue is
//! always read and written as a whole.

use crate::StorageError;
use encore_core::types::{Context, Queue, QueueId, TrackId, UserId};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

type Result<T> = std::result::Result<T, StorageError>;

fn from_row(row: &SqliteRow) -> Result<Queue> {
    let tracks: Vec<TrackId> = serde_json::from_str(&row.get::<String, _>("tracks_json"))?;
    let shuffle_list: Option<Vec<usize>> = row
        .get::<Option<String>, _>("shuffle_list_json")
        .map(|json| serde_json::from_str(&json))
        .transpose()?;

    Ok(Queue {
        id: QueueId::new(row.get::<String, _>("id")),
        user_id: UserId::new(row.get::<String, _>("user_id")),
        tracks,
        context: Context::from_parts(
            &row.get::<String, _>("context_type"),
            row.get::<Option<String>, _>("context_id").as_deref(),
        ),
        current_index: row.get::<Option<i64>, _>("current_index").map(|i| i as usize),
        shuffle_list,
        shuffle_index: row.get::<Option<i64>, _>("shuffle_index").map(|i| i as usize),
        version: row.get("version"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

/// Insert a new queue
pub async fn create(pool: &SqlitePool, queue: &Queue) -> Result<Queue> {
    let now = chrono::Utc::now().timestamp();
    let tracks_json = serde_json::to_string(&queue.tracks)?;
    let shuffle_json = queue.shuffle_list.as_ref().map(serde_json::to_string).transpose()?;

    sqlx::query(
        "INSERT INTO queues (id, user_id, context_type, context_id, tracks_json,
            current_index, shuffle_list_json, shuffle_index, version, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?)",
    )
    .bind(queue.id.as_str())
    .bind(queue.user_id.as_str())
    .bind(queue.context.kind())
    .bind(queue.context.id())
    .bind(tracks_json)
    .bind(queue.current_index.map(|i| i as i64))
    .bind(shuffle_json)
    .bind(queue.shuffle_index.map(|i| i as i64))
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(Queue {
        version: 0,
        created_at: now,
        updated_at: now,
        ..queue.clone()
    })
}

/// Get a queue by ID
pub async fn get(pool: &SqlitePool, id: &QueueId) -> Result<Option<Queue>> {
    let row = sqlx::query(
        "SELECT id, user_id, context_type, context_id, tracks_json, current_index,
                shuffle_list_json, shuffle_index, version, created_at, updated_at
         FROM queues WHERE id = ?",
    )
    .bind(id.as_str())
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(from_row).transpose()
}

/// Version-checked update of the mutable queue fields
pub async fn save(pool: &SqlitePool, queue: &Queue) -> Result<Queue> {
    let now = chrono::Utc::now().timestamp();
    let tracks_json = serde_json::to_string(&queue.tracks)?;
    let shuffle_json = queue.shuffle_list.as_ref().map(serde_json::to_string).transpose()?;

    let result = sqlx::query(
        "UPDATE queues SET
            context_type = ?, context_id = ?, tracks_json = ?, current_index = ?,
            shuffle_list_json = ?, shuffle_index = ?, version = version + 1, updated_at = ?
         WHERE id = ? AND version = ?",
    )
    .bind(queue.context.kind())
    .bind(queue.context.id())
    .bind(tracks_json)
    .bind(queue.current_index.map(|i| i as i64))
    .bind(shuffle_json)
    .bind(queue.shuffle_index.map(|i| i as i64))
    .bind(now)
    .bind(queue.id.as_str())
    .bind(queue.version)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(match get(pool, &queue.id).await? {
            Some(_) => StorageError::conflict("queue", queue.id.as_str()),
            None => StorageError::not_found("queue", queue.id.as_str()),
        });
    }

    Ok(Queue {
        version: queue.version + 1,
        updated_at: now,
        ..queue.clone()
    })
}

/// Delete a queue; returns whether it existed
pub async fn delete(pool: &SqlitePool, id: &QueueId) -> Result<bool> {
    let result = sqlx::query("DELETE FROM queues WHERE id = ?")
        .bind(id.as_str())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
