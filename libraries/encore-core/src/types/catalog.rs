//! Catalog types consumed by the playback engine

use super::{AdId, AlbumId, ArtistId, TrackId};
use serde::{Deserialize, Serialize};

/// A catalog track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    /// Primary artist
    pub artist_id: Option<ArtistId>,
    pub album_id: Option<AlbumId>,
    pub duration_ms: u64,
    /// Global play count
    pub plays: u64,
}

/// An advertisement slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ad {
    pub id: AdId,
    pub title: String,
    pub duration_ms: u64,
}
