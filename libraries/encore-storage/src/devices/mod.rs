//! Output devices registered per user

use crate::StorageError;
use encore_core::types::{Device, DeviceId, DeviceType, UserId};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

type Result<T> = std::result::Result<T, StorageError>;

fn from_row(row: &SqliteRow) -> Device {
    Device {
        id: DeviceId::new(row.get::<String, _>("id")),
        user_id: UserId::new(row.get::<String, _>("user_id")),
        name: row.get("name"),
        device_type: DeviceType::from_str(&row.get::<String, _>("device_type"))
            .unwrap_or(DeviceType::Web),
    }
}

/// Register a new device
///
/// # Arguments
///
/// * `pool` - Database connection pool
/// * `id` - Device ID
/// * `user_id` - Owner user ID
/// * `name` - Display name
/// * `device_type` - Platform type
pub async fn register(
    pool: &SqlitePool,
    id: &DeviceId,
    user_id: &UserId,
    name: &str,
    device_type: DeviceType,
) -> Result<Device> {
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "INSERT INTO devices (id, user_id, name, device_type, created_at)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(id.as_str())
    .bind(user_id.as_str())
    .bind(name)
    .bind(device_type.as_str())
    .bind(now)
    .execute(pool)
    .await?;

    Ok(Device {
        id: id.clone(),
        user_id: user_id.clone(),
        name: name.to_string(),
        device_type,
    })
}

/// Get a device owned by `user_id`
pub async fn get_for_user(
    pool: &SqlitePool,
    user_id: &UserId,
    id: &DeviceId,
) -> Result<Option<Device>> {
    let row = sqlx::query(
        "SELECT id, user_id, name, device_type FROM devices WHERE id = ? AND user_id = ?",
    )
    .bind(id.as_str())
    .bind(user_id.as_str())
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(from_row))
}

/// Get all devices for a user
pub async fn get_by_user(pool: &SqlitePool, user_id: &UserId) -> Result<Vec<Device>> {
    let rows = sqlx::query(
        "SELECT id, user_id, name, device_type FROM devices
         WHERE user_id = ? ORDER BY created_at, id",
    )
    .bind(user_id.as_str())
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(from_row).collect())
}
