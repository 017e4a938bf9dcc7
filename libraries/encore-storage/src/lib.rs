//! Encore Storage
//!
//! `SQLite` persistence for the Encore playback engine.
//!
//! This crate stores the per-user player record, queue documents, the
//! two-slot queue reference list, registered devices, the music catalog
//! and play history, and exposes all of it through the `encore-core`
//! store and collaborator traits.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: Each feature owns its own queries and logic
//! - **Optimistic Concurrency**: Player and queue saves are version-checked
//! - **Single Context**: [`SqliteStore`] implements every engine-facing trait
//!
//! # Example
//!
//! ```rust,no_run
//! use encore_storage::{create_pool, run_migrations, SqliteStore};
//! use encore_core::{Player, PlayerStore, UserId};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://encore.db").await?;
//! run_migrations(&pool).await?;
//!
//! let store = SqliteStore::new(pool);
//! let player = store.create_player(&Player::new(UserId::new("alice"), true)).await?;
//! assert_eq!(player.version, 0);
//! # Ok(())
//! # }
//! ```

mod context;
mod error;

// Playback state
pub mod devices;
pub mod players;
pub mod queue_refs;
pub mod queues;

// Catalog
pub mod ads;
pub mod albums;
pub mod artists;
pub mod genres;
pub mod playlists;
pub mod tracks;

// Activity
pub mod play_history;

pub use context::SqliteStore;
pub use error::StorageError;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://encore.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!(url = %database_url, "Creating SQLite pool");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    tracing::info!("SQLite pool ready");

    Ok(pool)
}
