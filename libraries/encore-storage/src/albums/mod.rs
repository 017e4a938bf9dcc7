use crate::error::Result;
use encore_core::types::*;
use sqlx::{Row, SqlitePool};

/// Input for seeding a catalog album
#[derive(Debug, Clone)]
pub struct CreateAlbum {
    pub id: AlbumId,
    pub title: String,
    pub artist_id: Option<ArtistId>,
    pub is_released: bool,
}

pub async fn create(pool: &SqlitePool, album: &CreateAlbum) -> Result<()> {
    sqlx::query("INSERT INTO albums (id, title, artist_id, is_released) VALUES (?, ?, ?, ?)")
        .bind(album.id.as_str())
        .bind(&album.title)
        .bind(album.artist_id.as_ref().map(ArtistId::as_str))
        .bind(i64::from(album.is_released))
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn exists(pool: &SqlitePool, id: &AlbumId) -> Result<bool> {
    let row = sqlx::query("SELECT 1 FROM albums WHERE id = ?")
        .bind(id.as_str())
        .fetch_optional(pool)
        .await?;

    Ok(row.is_some())
}

/// Album track list in album order; `None` if the album doesn't exist
pub async fn track_ids(pool: &SqlitePool, id: &AlbumId) -> Result<Option<Vec<TrackId>>> {
    if !exists(pool, id).await? {
        return Ok(None);
    }

    let rows = sqlx::query(
        "SELECT id FROM tracks WHERE album_id = ? ORDER BY album_position, id",
    )
    .bind(id.as_str())
    .fetch_all(pool)
    .await?;

    Ok(Some(
        rows.iter()
            .map(|row| TrackId::new(row.get::<String, _>("id")))
            .collect(),
    ))
}

/// Released albums sharing an artist or a genre with `id`
///
/// Albums sharing the artist come first.
pub async fn related(pool: &SqlitePool, id: &AlbumId, limit: usize) -> Result<Vec<AlbumId>> {
    let rows = sqlx::query(
        r#"
        SELECT a.id, MIN(a.tier) AS best FROM (
            SELECT other.id AS id, 0 AS tier
            FROM albums src
            INNER JOIN albums other ON other.artist_id = src.artist_id
            WHERE src.id = ? AND other.id != src.id AND other.is_released = 1
            UNION ALL
            SELECT other.id AS id, 1 AS tier
            FROM album_genres src
            INNER JOIN album_genres og ON og.genre_id = src.genre_id
            INNER JOIN albums other ON other.id = og.album_id
            WHERE src.album_id = ? AND other.id != ? AND other.is_released = 1
        ) a
        GROUP BY a.id
        ORDER BY best, a.id
        LIMIT ?
        "#,
    )
    .bind(id.as_str())
    .bind(id.as_str())
    .bind(id.as_str())
    .bind(limit as i64)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| AlbumId::new(row.get::<String, _>("id")))
        .collect())
}
