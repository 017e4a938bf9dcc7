use crate::error::Result;
use encore_core::types::*;
use sqlx::{Row, SqlitePool};

pub async fn create(pool: &SqlitePool, id: &ArtistId, name: &str) -> Result<()> {
    sqlx::query("INSERT INTO artists (id, name) VALUES (?, ?)")
        .bind(id.as_str())
        .bind(name)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn exists(pool: &SqlitePool, id: &ArtistId) -> Result<bool> {
    let row = sqlx::query("SELECT 1 FROM artists WHERE id = ?")
        .bind(id.as_str())
        .fetch_optional(pool)
        .await?;

    Ok(row.is_some())
}

/// Replace an artist's curated popular list
pub async fn set_popular_tracks(
    pool: &SqlitePool,
    id: &ArtistId,
    tracks: &[TrackId],
) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM artist_popular_tracks WHERE artist_id = ?")
        .bind(id.as_str())
        .execute(&mut *tx)
        .await?;

    for (position, track_id) in tracks.iter().enumerate() {
        sqlx::query(
            "INSERT OR IGNORE INTO artist_popular_tracks (artist_id, track_id, position)
             VALUES (?, ?, ?)",
        )
        .bind(id.as_str())
        .bind(track_id.as_str())
        .bind(position as i64)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Curated popular list; `None` if the artist doesn't exist
pub async fn popular_tracks(pool: &SqlitePool, id: &ArtistId) -> Result<Option<Vec<TrackId>>> {
    if !exists(pool, id).await? {
        return Ok(None);
    }

    let rows = sqlx::query(
        "SELECT track_id FROM artist_popular_tracks WHERE artist_id = ? ORDER BY position",
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

/// Artists sharing at least one genre, most shared genres first
pub async fn related(pool: &SqlitePool, id: &ArtistId, limit: usize) -> Result<Vec<ArtistId>> {
    let rows = sqlx::query(
        r#"
        SELECT og.artist_id AS id, COUNT(*) AS shared
        FROM artist_genres src
        INNER JOIN artist_genres og ON og.genre_id = src.genre_id
        WHERE src.artist_id = ? AND og.artist_id != ?
        GROUP BY og.artist_id
        ORDER BY shared DESC, og.artist_id
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
        .map(|row| ArtistId::new(row.get::<String, _>("id")))
        .collect())
}
