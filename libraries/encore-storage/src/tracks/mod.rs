use crate::error::{Result, StorageError};
use encore_core::types::*;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

/// Input for seeding a catalog track
#[derive(Debug, Clone)]
pub struct CreateTrack {
    pub id: TrackId,
    pub title: String,
    pub artist_id: Option<ArtistId>,
    pub album_id: Option<AlbumId>,
    pub album_position: u32,
    pub duration_ms: u64,
}

fn from_row(row: &SqliteRow) -> Track {
    Track {
        id: TrackId::new(row.get::<String, _>("id")),
        title: row.get("title"),
        artist_id: row.get::<Option<String>, _>("artist_id").map(ArtistId::new),
        album_id: row.get::<Option<String>, _>("album_id").map(AlbumId::new),
        duration_ms: row.get::<i64, _>("duration_ms") as u64,
        plays: row.get::<i64, _>("plays") as u64,
    }
}

pub async fn get_by_id(pool: &SqlitePool, id: &TrackId) -> Result<Option<Track>> {
    let row = sqlx::query(
        "SELECT id, title, artist_id, album_id, duration_ms, plays FROM tracks WHERE id = ?",
    )
    .bind(id.as_str())
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(from_row))
}

pub async fn create(pool: &SqlitePool, track: CreateTrack) -> Result<Track> {
    sqlx::query(
        "INSERT INTO tracks (id, title, artist_id, album_id, album_position, duration_ms, plays)
         VALUES (?, ?, ?, ?, ?, ?, 0)",
    )
    .bind(track.id.as_str())
    .bind(&track.title)
    .bind(track.artist_id.as_ref().map(ArtistId::as_str))
    .bind(track.album_id.as_ref().map(AlbumId::as_str))
    .bind(i64::from(track.album_position))
    .bind(track.duration_ms as i64)
    .execute(pool)
    .await?;

    Ok(Track {
        id: track.id,
        title: track.title,
        artist_id: track.artist_id,
        album_id: track.album_id,
        duration_ms: track.duration_ms,
        plays: 0,
    })
}

/// Tracks whose primary artist is `artist_id`, most played first
pub async fn top_by_plays(
    pool: &SqlitePool,
    artist_id: &ArtistId,
    limit: usize,
) -> Result<Vec<TrackId>> {
    let rows = sqlx::query(
        "SELECT id FROM tracks WHERE artist_id = ? ORDER BY plays DESC, id LIMIT ?",
    )
    .bind(artist_id.as_str())
    .bind(limit as i64)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| TrackId::new(row.get::<String, _>("id")))
        .collect())
}

/// Bump the global play count of one track
pub async fn increment_plays(pool: &SqlitePool, id: &TrackId) -> Result<()> {
    let result = sqlx::query("UPDATE tracks SET plays = plays + 1 WHERE id = ?")
        .bind(id.as_str())
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("track", id.as_str()));
    }

    Ok(())
}
