use crate::error::Result;
use encore_core::types::*;
use sqlx::{Row, SqlitePool};

/// Input for seeding a playlist
#[derive(Debug, Clone)]
pub struct CreatePlaylist {
    pub id: PlaylistId,
    pub name: String,
    pub owner_id: UserId,
    pub is_public: bool,
}

/// Create new playlist
pub async fn create(pool: &SqlitePool, playlist: &CreatePlaylist) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO playlists (id, name, owner_id, is_public)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(playlist.id.as_str())
    .bind(&playlist.name)
    .bind(playlist.owner_id.as_str())
    .bind(i64::from(playlist.is_public))
    .execute(pool)
    .await?;

    Ok(())
}

/// Add track at the end of a playlist
pub async fn add_track(pool: &SqlitePool, playlist_id: &PlaylistId, track_id: &TrackId) -> Result<()> {
    // Get next position
    let row = sqlx::query(
        "SELECT COALESCE(MAX(position), -1) + 1 AS next_pos FROM playlist_tracks WHERE playlist_id = ?",
    )
    .bind(playlist_id.as_str())
    .fetch_one(pool)
    .await?;
    let position: i64 = row.get("next_pos");

    sqlx::query(
        r#"
        INSERT OR IGNORE INTO playlist_tracks (playlist_id, track_id, position)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(playlist_id.as_str())
    .bind(track_id.as_str())
    .bind(position)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn exists(pool: &SqlitePool, id: &PlaylistId) -> Result<bool> {
    let row = sqlx::query("SELECT 1 FROM playlists WHERE id = ?")
        .bind(id.as_str())
        .fetch_optional(pool)
        .await?;

    Ok(row.is_some())
}

/// Playlist track list in stored order; `None` if the playlist doesn't exist
pub async fn track_ids(pool: &SqlitePool, id: &PlaylistId) -> Result<Option<Vec<TrackId>>> {
    if !exists(pool, id).await? {
        return Ok(None);
    }

    let rows = sqlx::query(
        "SELECT track_id FROM playlist_tracks WHERE playlist_id = ? ORDER BY position",
    )
    .bind(id.as_str())
    .fetch_all(pool)
    .await?;

    Ok(Some(
        rows.iter()
            .map(|row| TrackId::new(row.get::<String, _>("track_id")))
            .collect(),
    ))
}

/// Public playlists sharing at least one track with `id`, most overlap first
pub async fn related(
    pool: &SqlitePool,
    id: &PlaylistId,
    limit: usize,
) -> Result<Vec<PlaylistId>> {
    let rows = sqlx::query(
        r#"
        SELECT p.id, COUNT(*) AS shared
        FROM playlist_tracks src
        INNER JOIN playlist_tracks other ON other.track_id = src.track_id
        INNER JOIN playlists p ON p.id = other.playlist_id
        WHERE src.playlist_id = ? AND p.id != ? AND p.is_public = 1
        GROUP BY p.id
        ORDER BY shared DESC, p.id
        LIMIT ?
        "#,
    )
    .bind(id.as_str())
    .bind(id.as_str())
    .bind(limit as i64)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| PlaylistId::new(row.get::<String, _>("id")))
        .collect())
}

/// Public playlists containing any of `tracks`
pub async fn containing(
    pool: &SqlitePool,
    tracks: &[TrackId],
    limit: usize,
) -> Result<Vec<PlaylistId>> {
    if tracks.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; tracks.len()].join(", ");
    let sql = format!(
        "SELECT p.id, COUNT(*) AS shared
         FROM playlist_tracks pt
         INNER JOIN playlists p ON p.id = pt.playlist_id
         WHERE pt.track_id IN ({placeholders}) AND p.is_public = 1
         GROUP BY p.id
         ORDER BY shared DESC, p.id
         LIMIT ?"
    );

    let mut query = sqlx::query(&sql);
    for track_id in tracks {
        query = query.bind(track_id.as_str());
    }
    let rows = query.bind(limit as i64).fetch_all(pool).await?;

    Ok(rows
        .iter()
        .map(|row| PlaylistId::new(row.get::<String, _>("id")))
        .collect())
}
