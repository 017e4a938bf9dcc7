use crate::error::Result;
use encore_core::types::{AlbumId, ArtistId};
use sqlx::SqlitePool;

/// Genre ids are the lowercased name
fn genre_id(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Create a genre if missing; returns its id
pub async fn ensure(pool: &SqlitePool, name: &str) -> Result<String> {
    let id = genre_id(name);

    sqlx::query("INSERT INTO genres (id, name) VALUES (?, ?) ON CONFLICT(id) DO NOTHING")
        .bind(&id)
        .bind(name.trim())
        .execute(pool)
        .await?;

    Ok(id)
}

/// Tag an artist with a genre
pub async fn tag_artist(pool: &SqlitePool, artist_id: &ArtistId, genre: &str) -> Result<()> {
    let genre_id = ensure(pool, genre).await?;

    sqlx::query("INSERT OR IGNORE INTO artist_genres (artist_id, genre_id) VALUES (?, ?)")
        .bind(artist_id.as_str())
        .bind(genre_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Tag an album with a genre
pub async fn tag_album(pool: &SqlitePool, album_id: &AlbumId, genre: &str) -> Result<()> {
    let genre_id = ensure(pool, genre).await?;

    sqlx::query("INSERT OR IGNORE INTO album_genres (album_id, genre_id) VALUES (?, ?)")
        .bind(album_id.as_str())
        .bind(genre_id)
        .execute(pool)
        .await?;

    Ok(())
}
