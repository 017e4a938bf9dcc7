//! Queue operations: view, add, reorder, delete
use super::{DeleteSelector, QueueView, SessionEngine};
use crate::player;
use crate::queue;
use crate::shuffle;
use encore_core::{Context, DeviceId, EncoreError, Queue, Result, UserId};

impl SessionEngine {
    /// The active queue as seen by the player
    pub async fn get_queue(&self, user_id: &UserId) -> Result<QueueView> {
        let session = self.load(user_id).await?;
        Ok(QueueView::new(&session.player, session.queue.as_ref()))
    }

    /// Append tracks to the active queue
    ///
    /// Without an active queue an ad-hoc one is created; playback isn't
    /// started.
    pub async fn add_to_queue(
        &self,
        user_id: &UserId,
        uris: &[String],
        device_id: Option<&DeviceId>,
    ) -> Result<QueueView> {
        self.run(user_id, || async move {
            let mut session = self.load(user_id).await?;
            self.apply_device(&mut session, device_id).await?;

            let resolved = self.builder.resolve_uris(uris).await;
            if resolved.is_empty() {
                return Err(EncoreError::invalid_argument(
                    "none of the uris resolve to a track",
                ));
            }

            match session.queue.as_mut() {
                Some(active) => {
                    let added = queue::append(active, resolved);
                    tracing::debug!("Queued {} tracks on {}", added, active.id);
                }
                None => {
                    let mut adhoc = Queue::new(user_id.clone(), Context::Unknown, resolved);
                    if session.player.shuffle_state {
                        shuffle::enable(&mut adhoc, &mut rand::thread_rng());
                    }
                    tracing::debug!("Created ad-hoc queue {} for {}", adhoc.id, user_id);
                    session.install_queue(adhoc);
                }
            }

            let committed = self.commit(session).await?;
            Ok(QueueView::new(&committed.player, committed.queue.as_ref()))
        })
        .await
    }

    /// Move the track at `from` to `to`; the current track keeps playing
    pub async fn edit_queue_position(
        &self,
        user_id: &UserId,
        from: usize,
        to: usize,
    ) -> Result<QueueView> {
        self.run(user_id, || async move {
            let mut session = self.load(user_id).await?;
            queue::move_track(session.queue_mut()?, from, to)?;

            let committed = self.commit(session).await?;
            Ok(QueueView::new(&committed.player, committed.queue.as_ref()))
        })
        .await
    }

    /// Remove one track from the active queue
    ///
    /// Removing the current track resets the player. A queue left empty is
    /// deleted and its reference dropped.
    pub async fn delete_from_queue(
        &self,
        user_id: &UserId,
        selector: &DeleteSelector,
    ) -> Result<QueueView> {
        self.run(user_id, || async move {
            let mut session = self.load(user_id).await?;
            let active = session.queue_mut()?;
            let index = selector.resolve(active)?;
            let removal = queue::remove_at(active, index)?;
            let emptied = active.is_empty();

            let playing_removed = removal.was_current
                || (emptied && session.player.current_track() == Some(&removal.track));
            if playing_removed {
                tracing::debug!("Removed current track {} for {}", removal.track, user_id);
                player::reset_to_default(&mut session.player);
                if let Some(active) = session.queue.as_mut() {
                    shuffle::disable(active);
                }
            }
            if emptied {
                tracing::debug!("Queue emptied for {}; deleting it", user_id);
                session.drop_queue();
            }

            let committed = self.commit(session).await?;
            Ok(QueueView::new(&committed.player, committed.queue.as_ref()))
        })
        .await
    }
}
