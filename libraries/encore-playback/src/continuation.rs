//! Pick what plays after a queue runs out
//!
//! Given an exhausted queue, choose a related entity at random and build
//! a fresh track list for it:
//!
//! | exhausted context | candidates                                  | new context |
//! |-------------------|---------------------------------------------|-------------|
//! | album             | albums sharing a genre or an artist         | album       |
//! | artist            | artists sharing a genre                     | artist      |
//! | playlist          | public playlists sharing a track            | playlist    |
//! | unknown           | public playlists containing any queued track | playlist   |
//!
//! Any catalog failure, an empty candidate set or an empty candidate
//! yields no continuation; the caller leaves playback untouched.

use crate::builder::QueueBuilder;
use encore_core::{Catalog, Context, EncoreError, Queue, Result, TrackId};
use rand::seq::SliceRandom;
use std::sync::Arc;

/// A planned follow-up context with its tracks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Continuation {
    pub context: Context,
    pub tracks: Vec<TrackId>,
}

/// Plans continuations from related catalog content
#[derive(Clone)]
pub struct ContinuationPlanner {
    catalog: Arc<dyn Catalog>,
    builder: QueueBuilder,
    candidates: usize,
}

impl ContinuationPlanner {
    pub fn new(catalog: Arc<dyn Catalog>, builder: QueueBuilder, candidates: usize) -> Self {
        Self {
            catalog,
            builder,
            candidates,
        }
    }

    /// Plan a continuation for `exhausted`
    ///
    /// Fails only with `ContinuationUnavailable`; catalog errors are logged
    /// and folded into it.
    pub async fn plan(&self, exhausted: &Queue) -> Result<Continuation> {
        match self.try_plan(exhausted).await {
            Ok(Some(plan)) => Ok(plan),
            Ok(None) => Err(EncoreError::ContinuationUnavailable),
            Err(e) => {
                tracing::warn!(
                    "Continuation planning failed for {}: {}",
                    exhausted.context,
                    e
                );
                Err(EncoreError::ContinuationUnavailable)
            }
        }
    }

    async fn try_plan(&self, exhausted: &Queue) -> Result<Option<Continuation>> {
        let candidate = match &exhausted.context {
            Context::Album(id) => pick(&self.catalog.related_albums(id, self.candidates).await?)
                .map(Context::Album),
            Context::Artist(id) => {
                pick(&self.catalog.related_artists(id, self.candidates).await?)
                    .map(Context::Artist)
            }
            Context::Playlist(id) => {
                pick(&self.catalog.related_playlists(id, self.candidates).await?)
                    .map(Context::Playlist)
            }
            Context::Unknown => pick(
                &self
                    .catalog
                    .playlists_containing(&exhausted.tracks, self.candidates)
                    .await?,
            )
            .map(Context::Playlist),
        };

        let Some(context) = candidate else {
            tracing::debug!("No continuation candidates for {}", exhausted.context);
            return Ok(None);
        };

        match self.builder.tracks_for_context(&context).await {
            Ok(tracks) => Ok(Some(Continuation { context, tracks })),
            Err(EncoreError::NotFound { .. }) => {
                tracing::debug!("Continuation candidate {} has nothing to play", context);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

fn pick<T: Clone>(candidates: &[T]) -> Option<T> {
    candidates.choose(&mut rand::thread_rng()).cloned()
}
