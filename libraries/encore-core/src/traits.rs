//! Collaborator traits consumed by the playback engine
//!
//! These are implemented by the catalog, device and activity subsystems.
//! The engine only ever reads through `Catalog` and `DeviceDirectory`;
//! `ActivitySink` calls are best-effort.

use crate::error::Result;
use crate::types::{
    Ad, AdId, AlbumId, ArtistId, Context, Device, DeviceId, PlaylistId, Track, TrackId, UserId,
};
use async_trait::async_trait;

/// Read-only catalog lookups
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Get a track by ID
    async fn track(&self, id: &TrackId) -> Result<Option<Track>>;

    /// Album track list in stored order; `None` if the album doesn't exist
    async fn album_tracks(&self, id: &AlbumId) -> Result<Option<Vec<TrackId>>>;

    /// Playlist track list in stored order; `None` if the playlist doesn't exist
    async fn playlist_tracks(&self, id: &PlaylistId) -> Result<Option<Vec<TrackId>>>;

    /// Artist's curated "popular songs"; `None` if the artist doesn't exist
    async fn artist_popular_tracks(&self, id: &ArtistId) -> Result<Option<Vec<TrackId>>>;

    /// Top tracks whose primary artist is `id`, by descending play count
    async fn artist_top_tracks_by_plays(&self, id: &ArtistId, limit: usize)
        -> Result<Vec<TrackId>>;

    /// Artists sharing at least one genre with `id`, excluding `id`
    async fn related_artists(&self, id: &ArtistId, limit: usize) -> Result<Vec<ArtistId>>;

    /// Released albums sharing a genre or an artist with `id`, excluding `id`
    async fn related_albums(&self, id: &AlbumId, limit: usize) -> Result<Vec<AlbumId>>;

    /// Public playlists sharing at least one track with `id`, excluding `id`
    async fn related_playlists(&self, id: &PlaylistId, limit: usize) -> Result<Vec<PlaylistId>>;

    /// Public playlists containing at least one of `tracks`
    async fn playlists_containing(
        &self,
        tracks: &[TrackId],
        limit: usize,
    ) -> Result<Vec<PlaylistId>>;

    /// A uniformly random ad, if any exist
    async fn random_ad(&self) -> Result<Option<Ad>>;

    /// Get an ad by ID
    async fn ad(&self, id: &AdId) -> Result<Option<Ad>>;
}

/// Device lookups
#[async_trait]
pub trait DeviceDirectory: Send + Sync {
    /// Get a device owned by `user_id`
    ///
    /// Devices registered by other users are reported as absent.
    async fn device(&self, user_id: &UserId, id: &DeviceId) -> Result<Option<Device>>;
}

/// Best-effort activity recording
///
/// Failures are logged by the caller and never abort playback operations.
#[async_trait]
pub trait ActivitySink: Send + Sync {
    /// Append a play-history record for `context`
    async fn record_play_history(&self, user_id: &UserId, context: &Context) -> Result<()>;

    /// Increment a track's global play count
    async fn increment_play_count(&self, track_id: &TrackId) -> Result<()>;
}
