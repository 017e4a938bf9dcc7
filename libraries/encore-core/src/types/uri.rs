//! Resource uris: `track:<id>`, `album:<id>`, `artist:<id>`, `playlist:<id>`
//!
//! An optional `encore:` scheme prefix is accepted everywhere.

use super::{AlbumId, ArtistId, Context, PlaylistId, TrackId};
use crate::error::{EncoreError, Result};

const SCHEME: &str = "encore:";

fn split(uri: &str) -> Option<(&str, &str)> {
    let rest = uri.strip_prefix(SCHEME).unwrap_or(uri);
    let (kind, id) = rest.split_once(':')?;
    if id.is_empty() || id.contains(':') {
        return None;
    }
    Some((kind, id))
}

/// A parsed `track:<id>` uri
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackUri(TrackId);

impl TrackUri {
    /// Parse a track uri; returns `None` for anything else
    pub fn parse(uri: &str) -> Option<Self> {
        match split(uri)? {
            ("track", id) => Some(Self(TrackId::new(id))),
            _ => None,
        }
    }

    /// The referenced track id
    pub fn track_id(&self) -> &TrackId {
        &self.0
    }

    /// Consume into the track id
    pub fn into_track_id(self) -> TrackId {
        self.0
    }
}

impl Context {
    /// Parse a context uri (`album:<id>`, `artist:<id>`, `playlist:<id>`)
    pub fn parse_uri(uri: &str) -> Result<Self> {
        match split(uri) {
            Some(("album", id)) => Ok(Self::Album(AlbumId::new(id))),
            Some(("artist", id)) => Ok(Self::Artist(ArtistId::new(id))),
            Some(("playlist", id)) => Ok(Self::Playlist(PlaylistId::new(id))),
            _ => Err(EncoreError::invalid_argument(format!(
                "not a context uri: {uri}"
            ))),
        }
    }
}
