//! Playback session engine
//!
//! `SessionEngine` owns every user-facing playback operation. Each mutating
//! operation:
//!
//! 1. takes the user's lock,
//! 2. loads the player, reference list and active queue,
//! 3. applies its transition in memory,
//! 4. commits: player first (version-checked), then the queue, evicted
//!    queues, and finally the reference list,
//! 5. dispatches play-history and play-count activity.
//!
//! A version conflict on the first write leaves storage untouched, so the
//! whole operation is retried from a fresh load.

mod playback;
mod queue_ops;
mod views;

pub use views::{CurrentlyPlaying, DeleteSelector, PlayRequest, QueueView};

use crate::activity::ActivityDispatcher;
use crate::builder::QueueBuilder;
use crate::config::SessionConfig;
use crate::continuation::ContinuationPlanner;
use crate::locks::UserLocks;
use crate::navigation::{self, Direction, Step};
use crate::player;
use crate::slots::{Eviction, QueueSlots};
use encore_core::{
    ActivitySink, Catalog, Context, DeviceDirectory, DeviceId, EncoreError, Player, PlayerStore,
    Queue, QueueId, QueueRefStore, QueueStore, Result, TrackId, UserId,
};
use std::future::Future;
use std::sync::Arc;

/// Storage and collaborator handles the engine runs against
#[derive(Clone)]
pub struct SessionBackends {
    pub players: Arc<dyn PlayerStore>,
    pub queues: Arc<dyn QueueStore>,
    pub queue_refs: Arc<dyn QueueRefStore>,
    pub catalog: Arc<dyn Catalog>,
    pub devices: Arc<dyn DeviceDirectory>,
    pub activity: Arc<dyn ActivitySink>,
}

/// Per-user playback session engine
pub struct SessionEngine {
    players: Arc<dyn PlayerStore>,
    queues: Arc<dyn QueueStore>,
    queue_refs: Arc<dyn QueueRefStore>,
    catalog: Arc<dyn Catalog>,
    devices: Arc<dyn DeviceDirectory>,
    activity: ActivityDispatcher,
    builder: QueueBuilder,
    planner: ContinuationPlanner,
    locks: UserLocks,
    config: SessionConfig,
}

/// Side effects dispatched once a commit succeeds
#[derive(Debug)]
enum Effect {
    PlayHistory(Context),
    PlayCount(TrackId),
}

/// One operation's working copy of a user's state
struct Session {
    player: Player,
    queue: Option<Queue>,
    slots: QueueSlots,
    loaded_player: Player,
    loaded_queue: Option<Queue>,
    loaded_refs: Vec<QueueId>,
    evicted: Vec<QueueId>,
    effects: Vec<Effect>,
}

impl Session {
    fn user_id(&self) -> &UserId {
        &self.player.user_id
    }

    fn queue_mut(&mut self) -> Result<&mut Queue> {
        let user_id = self.player.user_id.as_str();
        self.queue
            .as_mut()
            .ok_or_else(|| EncoreError::not_found("queue", user_id))
    }

    /// Make `queue` active, demoting the current one
    fn install_queue(&mut self, queue: Queue) {
        if let Some(Eviction(id)) = self.slots.push_front(queue.id.clone()) {
            self.evicted.push(id);
        }
        self.queue = Some(queue);
    }

    /// Swap the active queue for `queue`
    fn replace_queue(&mut self, queue: Queue) {
        if let Some(Eviction(id)) = self.slots.replace_head(queue.id.clone()) {
            self.evicted.push(id);
        }
        self.queue = Some(queue);
    }

    /// Delete the active queue and drop its reference
    fn drop_queue(&mut self) {
        if let Some(queue) = self.queue.take() {
            self.slots.remove(&queue.id);
            self.evicted.push(queue.id);
        }
    }
}

/// Persisted state after a commit
struct Committed {
    player: Player,
    queue: Option<Queue>,
}

impl SessionEngine {
    /// Build an engine; spawns the activity worker on the current runtime
    pub fn new(backends: SessionBackends, config: SessionConfig) -> Self {
        let builder = QueueBuilder::new(Arc::clone(&backends.catalog), config.artist_top_tracks);
        let planner = ContinuationPlanner::new(
            Arc::clone(&backends.catalog),
            builder.clone(),
            config.continuation_candidates,
        );

        Self {
            players: backends.players,
            queues: backends.queues,
            queue_refs: backends.queue_refs,
            catalog: backends.catalog,
            devices: backends.devices,
            activity: ActivityDispatcher::spawn(backends.activity),
            builder,
            planner,
            locks: UserLocks::new(),
            config,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Users with an operation in flight
    pub fn active_sessions(&self) -> usize {
        self.locks.active()
    }

    /// Wait for dispatched activity to reach the sink
    pub async fn flush_activity(&self) {
        self.activity.flush().await;
    }

    /// Run `op` under the user's lock, retrying on version conflicts
    async fn run<T, F, Fut>(&self, user_id: &UserId, op: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let _guard = self.locks.lock(user_id).await;
        let attempts = self.config.conflict_retries.max(1);
        let mut attempt = 1;

        loop {
            match op().await {
                Err(e) if e.is_conflict() && attempt < attempts => {
                    tracing::debug!(
                        "Retrying operation for {} after conflict ({}/{}): {}",
                        user_id,
                        attempt,
                        attempts,
                        e
                    );
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    async fn load(&self, user_id: &UserId) -> Result<Session> {
        let player = self
            .players
            .get_player(user_id)
            .await?
            .ok_or_else(|| EncoreError::not_found("player", user_id.as_str()))?;

        let refs = self.queue_refs.get_queue_refs(user_id).await?;
        let (mut slots, overflow) = QueueSlots::from_refs(refs.clone());
        let evicted = overflow.into_iter().map(|Eviction(id)| id).collect();

        let mut queue = None;
        while let Some(id) = slots.active().cloned() {
            if let Some(found) = self.queues.get_queue(&id).await? {
                queue = Some(found);
                break;
            }
            tracing::warn!("Pruning dangling queue reference {} for {}", id, user_id);
            slots.remove(&id);
        }

        Ok(Session {
            loaded_player: player.clone(),
            player,
            loaded_queue: queue.clone(),
            queue,
            slots,
            loaded_refs: refs,
            evicted,
            effects: Vec::new(),
        })
    }

    /// Persist whatever the operation changed
    async fn commit(&self, session: Session) -> Result<Committed> {
        let Session {
            player,
            queue,
            slots,
            loaded_player,
            loaded_queue,
            loaded_refs,
            evicted,
            effects,
        } = session;
        let user_id = player.user_id.clone();
        let mut written = false;

        let player = if player == loaded_player {
            player
        } else {
            let saved = self.players.save_player(&player).await?;
            written = true;
            saved
        };

        let queue = match queue {
            Some(queue) if loaded_queue.as_ref().map(|q| &q.id) != Some(&queue.id) => {
                let created = self
                    .queues
                    .create_queue(&queue)
                    .await
                    .map_err(|e| after_write(written, e))?;
                written = true;
                Some(created)
            }
            Some(queue) if loaded_queue.as_ref() != Some(&queue) => {
                let saved = self
                    .queues
                    .save_queue(&queue)
                    .await
                    .map_err(|e| after_write(written, e))?;
                written = true;
                Some(saved)
            }
            other => other,
        };

        for id in &evicted {
            if self
                .queues
                .delete_queue(id)
                .await
                .map_err(|e| after_write(written, e))?
            {
                tracing::debug!("Deleted evicted queue {} for {}", id, user_id);
            }
            written = true;
        }

        let refs = slots.to_vec();
        if refs != loaded_refs {
            self.queue_refs
                .set_queue_refs(&user_id, &refs)
                .await
                .map_err(|e| after_write(written, e))?;
        }

        for effect in effects {
            match effect {
                Effect::PlayHistory(context) => {
                    self.activity.record_play_history(user_id.clone(), context);
                }
                Effect::PlayCount(track_id) => self.activity.increment_play_count(track_id),
            }
        }

        Ok(Committed { player, queue })
    }

    async fn apply_device(&self, session: &mut Session, device_id: Option<&DeviceId>) -> Result<()> {
        let Some(device_id) = device_id else {
            return Ok(());
        };
        let device = self
            .devices
            .device(session.user_id(), device_id)
            .await?
            .ok_or_else(|| EncoreError::not_found("device", device_id.as_str()))?;
        session.player.device_id = Some(device.id);
        Ok(())
    }

    /// Load `track` into the player, or an ad if one is due
    async fn add_track_to_player(
        &self,
        session: &mut Session,
        track: TrackId,
        context: Option<Context>,
    ) {
        session.effects.push(Effect::PlayCount(track.clone()));

        if player::register_track_change(&mut session.player, &track, self.config.ad_interval) {
            match self.catalog.random_ad().await {
                Ok(Some(ad)) => {
                    tracing::info!("Playing ad {} for {}", ad.id, session.user_id());
                    player::start_ad(&mut session.player, &ad);
                    return;
                }
                Ok(None) => tracing::warn!("Ad due for {} but none are available", session.user_id()),
                Err(e) => tracing::warn!("Ad lookup failed for {}: {}", session.user_id(), e),
            }
        }

        player::start_track(&mut session.player, track, context);
    }

    /// Step through the active queue, continuing past its end if possible
    async fn navigate(&self, session: &mut Session, direction: Direction) -> Result<()> {
        let repeat = session.player.repeat_state;
        let queue = session.queue_mut()?;

        let (track, context) = match navigation::plan_step(queue, direction, repeat) {
            Step::Replay => match queue.current_track() {
                Some(track) => (track.clone(), None),
                None => return Ok(()),
            },
            Step::Move { position, wrapped } => {
                let index = navigation::move_to(queue, position);
                if wrapped {
                    tracing::debug!("Queue {} wrapped around", queue.id);
                }
                match queue.tracks.get(index) {
                    Some(track) => (track.clone(), Some(queue.context.clone())),
                    None => return Ok(()),
                }
            }
            Step::Exhausted => return self.continue_session(session).await,
        };

        if let Some(context) = context.as_ref().filter(|c| !c.is_unknown()) {
            session.effects.push(Effect::PlayHistory(context.clone()));
        }
        self.add_track_to_player(session, track, context).await;
        Ok(())
    }

    /// Replace an exhausted queue with related content
    ///
    /// Leaves playback untouched when nothing can be planned.
    async fn continue_session(&self, session: &mut Session) -> Result<()> {
        let Some(exhausted) = session.queue.as_ref() else {
            return Ok(());
        };
        let plan = match self.planner.plan(exhausted).await {
            Ok(plan) => plan,
            Err(e) => {
                tracing::info!(
                    "{} after {} for {}; playback unchanged",
                    e,
                    exhausted.context,
                    session.user_id()
                );
                return Ok(());
            }
        };

        let mut queue = Queue::new(session.user_id().clone(), plan.context.clone(), plan.tracks);
        let first = navigation::move_to(&mut queue, 0);
        let Some(track) = queue.tracks.get(first).cloned() else {
            return Ok(());
        };
        tracing::info!(
            "Continuing {} with {} ({} tracks)",
            session.user_id(),
            plan.context,
            queue.len()
        );

        player::reset_to_default(&mut session.player);
        session.replace_queue(queue);
        session.effects.push(Effect::PlayHistory(plan.context.clone()));
        self.add_track_to_player(session, track, Some(plan.context)).await;
        Ok(())
    }
}

/// Conflicts after a partial commit can't be retried safely
fn after_write(written: bool, err: EncoreError) -> EncoreError {
    if written && err.is_conflict() {
        tracing::error!("Conflict after partial commit: {}", err);
        EncoreError::storage(format!("partially applied: {err}"))
    } else {
        err
    }
}
