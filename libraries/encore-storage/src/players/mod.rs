//! Per-user player records with optimistic versioning

use crate::StorageError;
use encore_core::types::{
    Actions, AdId, Context, CurrentlyPlayingType, DeviceId, PlayableItem, Player, RepeatState,
    TrackId, UserId,
};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

type Result<T> = std::result::Result<T, StorageError>;

const COLUMNS: &str = "user_id, device_id, item_type, item_id, context_type, context_id,
    progress_ms, is_playing, shuffle_state, repeat_state, currently_playing_type,
    ads_counter, actions_json, version, updated_at";

fn from_row(row: &SqliteRow) -> Result<Player> {
    let item = match (
        row.get::<Option<String>, _>("item_type").as_deref(),
        row.get::<Option<String>, _>("item_id"),
    ) {
        (Some("track"), Some(id)) => Some(PlayableItem::Track(TrackId::new(id))),
        (Some("ad"), Some(id)) => Some(PlayableItem::Ad(AdId::new(id))),
        _ => None,
    };
    let actions = row
        .get::<Option<String>, _>("actions_json")
        .map(|json| serde_json::from_str::<Actions>(&json))
        .transpose()?;

    Ok(Player {
        user_id: UserId::new(row.get::<String, _>("user_id")),
        device_id: row.get::<Option<String>, _>("device_id").map(DeviceId::new),
        item,
        context: Context::from_parts(
            &row.get::<String, _>("context_type"),
            row.get::<Option<String>, _>("context_id").as_deref(),
        ),
        progress_ms: row.get::<Option<i64>, _>("progress_ms").map(|ms| ms as u64),
        is_playing: row.get::<i64, _>("is_playing") != 0,
        shuffle_state: row.get::<i64, _>("shuffle_state") != 0,
        repeat_state: RepeatState::from_str(&row.get::<String, _>("repeat_state"))
            .unwrap_or_default(),
        currently_playing_type: CurrentlyPlayingType::from_str(
            &row.get::<String, _>("currently_playing_type"),
        )
        .unwrap_or_default(),
        ads_counter: row.get::<Option<i64>, _>("ads_counter").map(|n| n as u32),
        actions,
        version: row.get("version"),
        updated_at: row.get("updated_at"),
    })
}

fn item_parts(item: Option<&PlayableItem>) -> (Option<&'static str>, Option<&str>) {
    match item {
        Some(PlayableItem::Track(id)) => (Some("track"), Some(id.as_str())),
        Some(PlayableItem::Ad(id)) => (Some("ad"), Some(id.as_str())),
        None => (None, None),
    }
}

/// Get a user's player
pub async fn get(pool: &SqlitePool, user_id: &UserId) -> Result<Option<Player>> {
    let row = sqlx::query(&format!("SELECT {COLUMNS} FROM players WHERE user_id = ?"))
        .bind(user_id.as_str())
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(from_row).transpose()
}

/// Insert a player unless the user already has one; returns the stored record
pub async fn create(pool: &SqlitePool, player: &Player) -> Result<Player> {
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "INSERT INTO players (user_id, ads_counter, version, updated_at)
         VALUES (?, ?, 0, ?)
         ON CONFLICT(user_id) DO NOTHING",
    )
    .bind(player.user_id.as_str())
    .bind(player.ads_counter.map(i64::from))
    .bind(now)
    .execute(pool)
    .await?;

    get(pool, &player.user_id)
        .await?
        .ok_or_else(|| StorageError::not_found("player", player.user_id.as_str()))
}

/// Version-checked update; returns the record with its bumped version
pub async fn save(pool: &SqlitePool, player: &Player) -> Result<Player> {
    let now = chrono::Utc::now().timestamp();
    let (item_type, item_id) = item_parts(player.item.as_ref());
    let actions_json = player.actions.as_ref().map(serde_json::to_string).transpose()?;

    let result = sqlx::query(
        "UPDATE players SET
            device_id = ?, item_type = ?, item_id = ?, context_type = ?, context_id = ?,
            progress_ms = ?, is_playing = ?, shuffle_state = ?, repeat_state = ?,
            currently_playing_type = ?, ads_counter = ?, actions_json = ?,
            version = version + 1, updated_at = ?
         WHERE user_id = ? AND version = ?",
    )
    .bind(player.device_id.as_ref().map(DeviceId::as_str))
    .bind(item_type)
    .bind(item_id)
    .bind(player.context.kind())
    .bind(player.context.id())
    .bind(player.progress_ms.map(|ms| ms as i64))
    .bind(i64::from(player.is_playing))
    .bind(i64::from(player.shuffle_state))
    .bind(player.repeat_state.as_str())
    .bind(player.currently_playing_type.as_str())
    .bind(player.ads_counter.map(i64::from))
    .bind(actions_json)
    .bind(now)
    .bind(player.user_id.as_str())
    .bind(player.version)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(match get(pool, &player.user_id).await? {
            Some(_) => StorageError::conflict("player", player.user_id.as_str()),
            None => StorageError::not_found("player", player.user_id.as_str()),
        });
    }

    Ok(Player {
        version: player.version + 1,
        updated_at: now,
        ..player.clone()
    })
}
