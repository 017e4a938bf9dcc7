use crate::error::Result;
use encore_core::types::*;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

fn from_row(row: &SqliteRow) -> Ad {
    Ad {
        id: AdId::new(row.get::<String, _>("id")),
        title: row.get("title"),
        duration_ms: row.get::<i64, _>("duration_ms") as u64,
    }
}

pub async fn create(pool: &SqlitePool, ad: &Ad) -> Result<()> {
    sqlx::query("INSERT INTO ads (id, title, duration_ms) VALUES (?, ?, ?)")
        .bind(ad.id.as_str())
        .bind(&ad.title)
        .bind(ad.duration_ms as i64)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn get_by_id(pool: &SqlitePool, id: &AdId) -> Result<Option<Ad>> {
    let row = sqlx::query("SELECT id, title, duration_ms FROM ads WHERE id = ?")
        .bind(id.as_str())
        .fetch_optional(pool)
        .await?;

    Ok(row.as_ref().map(from_row))
}

/// Uniformly random ad
pub async fn random(pool: &SqlitePool) -> Result<Option<Ad>> {
    let row = sqlx::query("SELECT id, title, duration_ms FROM ads ORDER BY RANDOM() LIMIT 1")
        .fetch_optional(pool)
        .await?;

    Ok(row.as_ref().map(from_row))
}
