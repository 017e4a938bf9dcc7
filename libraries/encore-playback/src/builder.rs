//! Resolve contexts and uris into track lists
use encore_core::{Catalog, Context, EncoreError, Result, TrackId, TrackUri};
use std::collections::HashSet;
use std::sync::Arc;

/// Builds queue track lists from the catalog
#[derive(Clone)]
pub struct QueueBuilder {
    catalog: Arc<dyn Catalog>,
    artist_top_tracks: usize,
}

impl QueueBuilder {
    pub fn new(catalog: Arc<dyn Catalog>, artist_top_tracks: usize) -> Self {
        Self {
            catalog,
            artist_top_tracks,
        }
    }

    /// Track list for a context, in the entity's stored order
    ///
    /// Artists use their curated popular tracks, falling back to their
    /// most-played tracks. Fails with `NotFound` when the entity is missing
    /// or has nothing to play.
    pub async fn tracks_for_context(&self, context: &Context) -> Result<Vec<TrackId>> {
        let tracks = match context {
            Context::Album(id) => self.catalog.album_tracks(id).await?,
            Context::Playlist(id) => self.catalog.playlist_tracks(id).await?,
            Context::Artist(id) => match self.catalog.artist_popular_tracks(id).await? {
                Some(popular) if !popular.is_empty() => Some(popular),
                Some(_) => Some(
                    self.catalog
                        .artist_top_tracks_by_plays(id, self.artist_top_tracks)
                        .await?,
                ),
                None => None,
            },
            Context::Unknown => {
                return Err(EncoreError::invalid_argument(
                    "cannot build a queue for an unknown context",
                ))
            }
        };

        match tracks {
            Some(tracks) if !tracks.is_empty() => Ok(dedup(tracks)),
            _ => Err(EncoreError::not_found(
                context.kind(),
                context.id().unwrap_or_default(),
            )),
        }
    }

    /// Resolve track uris, keeping order
    ///
    /// Malformed uris, unknown tracks and failed lookups are dropped;
    /// duplicates keep their first occurrence.
    pub async fn resolve_uris(&self, uris: &[String]) -> Vec<TrackId> {
        let mut resolved = Vec::with_capacity(uris.len());
        for uri in uris {
            let Some(parsed) = TrackUri::parse(uri) else {
                tracing::debug!("Dropping malformed track uri: {}", uri);
                continue;
            };
            match self.catalog.track(parsed.track_id()).await {
                Ok(Some(track)) => resolved.push(track.id),
                Ok(None) => tracing::debug!("Dropping unknown track: {}", uri),
                Err(e) => tracing::warn!("Track lookup failed for {}: {}", uri, e),
            }
        }
        dedup(resolved)
    }
}

fn dedup(tracks: Vec<TrackId>) -> Vec<TrackId> {
    let mut seen = HashSet::with_capacity(tracks.len());
    tracks
        .into_iter()
        .filter(|track| seen.insert(track.clone()))
        .collect()
}
