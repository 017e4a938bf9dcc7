use crate::{
    ads, albums, artists, devices, play_history, players, playlists, queue_refs, queues, tracks,
};
use async_trait::async_trait;
use encore_core::{
    error::Result,
    storage::{PlayerStore, QueueRefStore, QueueStore},
    traits::{ActivitySink, Catalog, DeviceDirectory},
    types::*,
};
use sqlx::SqlitePool;

/// `SQLite`-backed implementation of every engine-facing trait
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl PlayerStore for SqliteStore {
    async fn get_player(&self, user_id: &UserId) -> Result<Option<Player>> {
        Ok(players::get(&self.pool, user_id).await?)
    }

    async fn create_player(&self, player: &Player) -> Result<Player> {
        Ok(players::create(&self.pool, player).await?)
    }

    async fn save_player(&self, player: &Player) -> Result<Player> {
        Ok(players::save(&self.pool, player).await?)
    }
}

#[async_trait]
impl QueueStore for SqliteStore {
    async fn create_queue(&self, queue: &Queue) -> Result<Queue> {
        Ok(queues::create(&self.pool, queue).await?)
    }

    async fn get_queue(&self, id: &QueueId) -> Result<Option<Queue>> {
        Ok(queues::get(&self.pool, id).await?)
    }

    async fn save_queue(&self, queue: &Queue) -> Result<Queue> {
        Ok(queues::save(&self.pool, queue).await?)
    }

    async fn delete_queue(&self, id: &QueueId) -> Result<bool> {
        Ok(queues::delete(&self.pool, id).await?)
    }
}

#[async_trait]
impl QueueRefStore for SqliteStore {
    async fn get_queue_refs(&self, user_id: &UserId) -> Result<Vec<QueueId>> {
        Ok(queue_refs::get(&self.pool, user_id).await?)
    }

    async fn set_queue_refs(&self, user_id: &UserId, refs: &[QueueId]) -> Result<()> {
        Ok(queue_refs::set(&self.pool, user_id, refs).await?)
    }
}

#[async_trait]
impl Catalog for SqliteStore {
    async fn track(&self, id: &TrackId) -> Result<Option<Track>> {
        Ok(tracks::get_by_id(&self.pool, id).await?)
    }

    async fn album_tracks(&self, id: &AlbumId) -> Result<Option<Vec<TrackId>>> {
        Ok(albums::track_ids(&self.pool, id).await?)
    }

    async fn playlist_tracks(&self, id: &PlaylistId) -> Result<Option<Vec<TrackId>>> {
        Ok(playlists::track_ids(&self.pool, id).await?)
    }

    async fn artist_popular_tracks(&self, id: &ArtistId) -> Result<Option<Vec<TrackId>>> {
        Ok(artists::popular_tracks(&self.pool, id).await?)
    }

    async fn artist_top_tracks_by_plays(
        &self,
        id: &ArtistId,
        limit: usize,
    ) -> Result<Vec<TrackId>> {
        Ok(tracks::top_by_plays(&self.pool, id, limit).await?)
    }

    async fn related_artists(&self, id: &ArtistId, limit: usize) -> Result<Vec<ArtistId>> {
        Ok(artists::related(&self.pool, id, limit).await?)
    }

    async fn related_albums(&self, id: &AlbumId, limit: usize) -> Result<Vec<AlbumId>> {
        Ok(albums::related(&self.pool, id, limit).await?)
    }

    async fn related_playlists(&self, id: &PlaylistId, limit: usize) -> Result<Vec<PlaylistId>> {
        Ok(playlists::related(&self.pool, id, limit).await?)
    }

    async fn playlists_containing(
        &self,
        tracks: &[TrackId],
        limit: usize,
    ) -> Result<Vec<PlaylistId>> {
        Ok(playlists::containing(&self.pool, tracks, limit).await?)
    }

    async fn random_ad(&self) -> Result<Option<Ad>> {
        Ok(ads::random(&self.pool).await?)
    }

    async fn ad(&self, id: &AdId) -> Result<Option<Ad>> {
        Ok(ads::get_by_id(&self.pool, id).await?)
    }
}

#[async_trait]
impl DeviceDirectory for SqliteStore {
    async fn device(&self, user_id: &UserId, id: &DeviceId) -> Result<Option<Device>> {
        Ok(devices::get_for_user(&self.pool, user_id, id).await?)
    }
}

#[async_trait]
impl ActivitySink for SqliteStore {
    async fn record_play_history(&self, user_id: &UserId, context: &Context) -> Result<()> {
        Ok(play_history::record(&self.pool, user_id, context).await?)
    }

    async fn increment_play_count(&self, track_id: &TrackId) -> Result<()> {
        Ok(tracks::increment_plays(&self.pool, track_id).await?)
    }
}
