//! Transport operations: play, pause, seek, skip, transfer, progress
use super::{CurrentlyPlaying, Effect, PlayRequest, Session, SessionEngine};
use crate::navigation::{self, Direction, Offset};
use crate::player::{self, Restriction};
use crate::queue;
use crate::shuffle;
use encore_core::{
    Context, DeviceId, EncoreError, PlayableItem, Player, Queue, RepeatState, Result, TrackUri,
    UserId,
};

impl SessionEngine {
    /// Create a player for a new account; returns the existing one if present
    pub async fn create_player(&self, user_id: &UserId, ad_supported: bool) -> Result<Player> {
        let player = self
            .players
            .create_player(&Player::new(user_id.clone(), ad_supported))
            .await?;
        tracing::info!("Player ready for {} (ads: {})", user_id, ad_supported);
        Ok(player)
    }

    /// Get a user's playback state
    pub async fn get_player(&self, user_id: &UserId) -> Result<Player> {
        self.players
            .get_player(user_id)
            .await?
            .ok_or_else(|| EncoreError::not_found("player", user_id.as_str()))
    }

    /// Playback state with catalog details for the loaded item
    pub async fn currently_playing(&self, user_id: &UserId) -> Result<CurrentlyPlaying> {
        let player = self.get_player(user_id).await?;
        let mut view = CurrentlyPlaying {
            player,
            track: None,
            ad: None,
        };

        match &view.player.item {
            Some(PlayableItem::Track(id)) => match self.catalog.track(id).await {
                Ok(track) => view.track = track,
                Err(e) => tracing::warn!("Track lookup failed for {}: {}", id, e),
            },
            Some(PlayableItem::Ad(id)) => match self.catalog.ad(id).await {
                Ok(ad) => view.ad = ad,
                Err(e) => tracing::warn!("Ad lookup failed for {}: {}", id, e),
            },
            None => {}
        }
        Ok(view)
    }

    /// Start a context, play track uris, or resume
    pub async fn play(&self, user_id: &UserId, request: &PlayRequest) -> Result<Player> {
        if request.context_uri.is_some() && request.uris.is_some() {
            return Err(EncoreError::invalid_argument(
                "context_uri and uris are mutually exclusive",
            ));
        }
        self.run(user_id, || self.play_once(user_id, request)).await
    }

    pub async fn pause(&self, user_id: &UserId, device_id: Option<&DeviceId>) -> Result<Player> {
        self.run(user_id, || async move {
            let mut session = self.load(user_id).await?;
            player::ensure_allowed(&session.player, Restriction::Pausing)?;
            self.apply_device(&mut session, device_id).await?;
            session.player.is_playing = false;
            Ok(self.commit(session).await?.player)
        })
        .await
    }

    /// Jump within the loaded item
    pub async fn seek(
        &self,
        user_id: &UserId,
        position_ms: u64,
        device_id: Option<&DeviceId>,
    ) -> Result<Player> {
        self.run(user_id, || async move {
            let mut session = self.load(user_id).await?;
            player::ensure_allowed(&session.player, Restriction::Seeking)?;
            self.apply_device(&mut session, device_id).await?;
            if session.player.item.is_none() {
                return Err(EncoreError::not_found("player item", user_id.as_str()));
            }
            session.player.progress_ms = Some(position_ms);
            Ok(self.commit(session).await?.player)
        })
        .await
    }

    pub async fn set_repeat(
        &self,
        user_id: &UserId,
        state: RepeatState,
        device_id: Option<&DeviceId>,
    ) -> Result<Player> {
        self.run(user_id, || async move {
            let mut session = self.load(user_id).await?;
            player::ensure_allowed(
                &session.player,
                Restriction::for_repeat(session.player.repeat_state, state),
            )?;
            self.apply_device(&mut session, device_id).await?;
            session.player.repeat_state = state;
            Ok(self.commit(session).await?.player)
        })
        .await
    }

    /// Toggle shuffle; the active queue keeps playing the same track
    pub async fn set_shuffle(
        &self,
        user_id: &UserId,
        state: bool,
        device_id: Option<&DeviceId>,
    ) -> Result<Player> {
        self.run(user_id, || async move {
            let mut session = self.load(user_id).await?;
            player::ensure_allowed(&session.player, Restriction::TogglingShuffle)?;
            self.apply_device(&mut session, device_id).await?;
            session.player.shuffle_state = state;
            if let Some(queue) = session.queue.as_mut() {
                if state {
                    shuffle::enable(queue, &mut rand::thread_rng());
                } else {
                    shuffle::disable(queue);
                }
            }
            Ok(self.commit(session).await?.player)
        })
        .await
    }

    pub async fn next(&self, user_id: &UserId, device_id: Option<&DeviceId>) -> Result<Player> {
        self.skip(user_id, device_id, Direction::Next).await
    }

    pub async fn previous(&self, user_id: &UserId, device_id: Option<&DeviceId>) -> Result<Player> {
        self.skip(user_id, device_id, Direction::Previous).await
    }

    /// Move playback to another of the user's devices
    ///
    /// `play: Some(true)` starts playback if an item is loaded,
    /// `Some(false)` pauses, `None` keeps the current state.
    pub async fn transfer(
        &self,
        user_id: &UserId,
        device_id: &DeviceId,
        play: Option<bool>,
    ) -> Result<Player> {
        self.run(user_id, || async move {
            let mut session = self.load(user_id).await?;
            player::ensure_allowed(&session.player, Restriction::TransferringPlayback)?;
            self.apply_device(&mut session, Some(device_id)).await?;
            match play {
                Some(true) => session.player.is_playing = session.player.item.is_some(),
                Some(false) => session.player.is_playing = false,
                None => {}
            }
            Ok(self.commit(session).await?.player)
        })
        .await
    }

    /// Client heartbeat; finishing an item auto-advances
    ///
    /// Reaching the end of an ad resumes the queue's current track; so does
    /// any report on an ad whose duration is unknown. Reaching the end of a
    /// track behaves like `next`. Never restricted.
    pub async fn report_progress(&self, user_id: &UserId, progress_ms: u64) -> Result<Player> {
        self.run(user_id, || async move {
            let mut session = self.load(user_id).await?;
            let Some(item) = session.player.item.clone() else {
                return Err(EncoreError::not_found("player item", user_id.as_str()));
            };
            session.player.progress_ms = Some(progress_ms);

            let finished = match (self.item_duration(&item).await, &item) {
                (Some(duration), _) => progress_ms >= duration,
                // An ad that can't be looked up would hold the restrictions forever
                (None, PlayableItem::Ad(id)) => {
                    tracing::warn!("Ending ad {} for {} without a known duration", id, user_id);
                    true
                }
                (None, PlayableItem::Track(_)) => false,
            };
            if finished {
                match item {
                    PlayableItem::Ad(_) => finish_ad(&mut session),
                    PlayableItem::Track(_) if session.queue.is_some() => {
                        self.navigate(&mut session, Direction::Next).await?;
                    }
                    PlayableItem::Track(_) => session.player.is_playing = false,
                }
            }
            Ok(self.commit(session).await?.player)
        })
        .await
    }

    async fn skip(
        &self,
        user_id: &UserId,
        device_id: Option<&DeviceId>,
        direction: Direction,
    ) -> Result<Player> {
        let restriction = match direction {
            Direction::Next => Restriction::SkippingNext,
            Direction::Previous => Restriction::SkippingPrev,
        };
        self.run(user_id, || async move {
            let mut session = self.load(user_id).await?;
            player::ensure_allowed(&session.player, restriction)?;
            self.apply_device(&mut session, device_id).await?;
            self.navigate(&mut session, direction).await?;
            Ok(self.commit(session).await?.player)
        })
        .await
    }

    async fn play_once(&self, user_id: &UserId, request: &PlayRequest) -> Result<Player> {
        let mut session = self.load(user_id).await?;
        let restriction = if request.context_uri.is_some() || request.uris.is_some() {
            Restriction::InterruptingPlayback
        } else {
            Restriction::Resuming
        };
        player::ensure_allowed(&session.player, restriction)?;
        self.apply_device(&mut session, request.device_id.as_ref())
            .await?;

        let offset = request.offset.as_ref();
        match (&request.context_uri, &request.uris) {
            (Some(uri), _) => self.start_context(&mut session, uri, offset).await?,
            (None, Some(uris)) => self.start_uris(&mut session, uris, offset).await?,
            (None, None) => self.resume(&mut session, offset).await?,
        }

        if let Some(position) = request.position_ms {
            if session.player.item.is_some() && !session.player.in_ad_break() {
                session.player.progress_ms = Some(position);
            }
        }
        Ok(self.commit(session).await?.player)
    }

    /// Build a queue for a context and start it at `offset`
    async fn start_context(
        &self,
        session: &mut Session,
        uri: &str,
        offset: Option<&Offset>,
    ) -> Result<()> {
        let context = Context::parse_uri(uri)?;
        let tracks = self.builder.tracks_for_context(&context).await?;

        let mut new_queue = Queue::new(session.user_id().clone(), context.clone(), tracks);
        let index = navigation::resolve_offset(&new_queue, offset);
        queue::set_current(&mut new_queue, index);
        if session.player.shuffle_state {
            shuffle::enable(&mut new_queue, &mut rand::thread_rng());
        }
        let track = new_queue
            .tracks
            .get(index)
            .cloned()
            .ok_or_else(|| EncoreError::not_found(context.kind(), uri))?;

        tracing::debug!(
            "Starting {} for {} at track {}",
            context,
            session.user_id(),
            index
        );
        session.install_queue(new_queue);
        session.effects.push(Effect::PlayHistory(context.clone()));
        self.add_track_to_player(session, track, Some(context)).await;
        Ok(())
    }

    /// Play explicit tracks, appending to the active queue if there is one
    async fn start_uris(
        &self,
        session: &mut Session,
        uris: &[String],
        offset: Option<&Offset>,
    ) -> Result<()> {
        let resolved = self.builder.resolve_uris(uris).await;
        let target = match offset {
            Some(Offset::Position(position)) => resolved.get(*position),
            Some(Offset::Uri(uri)) => TrackUri::parse(uri)
                .and_then(|uri| resolved.iter().find(|track| *track == uri.track_id())),
            None => None,
        }
        .or_else(|| resolved.first())
        .cloned()
        .ok_or_else(|| EncoreError::invalid_argument("none of the uris resolve to a track"))?;

        let shuffle_state = session.player.shuffle_state;
        match session.queue.as_mut() {
            Some(active) => {
                let added = queue::append(active, resolved);
                tracing::debug!("Appended {} tracks to queue {}", added, active.id);
            }
            None => {
                session.install_queue(Queue::new(
                    session.user_id().clone(),
                    Context::Unknown,
                    resolved,
                ));
            }
        }

        let active = session.queue_mut()?;
        let index = queue::position_of(active, &target)
            .ok_or_else(|| EncoreError::not_found("queued track", target.as_str()))?;
        queue::set_current(active, index);
        if shuffle_state {
            shuffle::enable(active, &mut rand::thread_rng());
        }
        let context = active.context.clone();

        if !context.is_unknown() {
            session.effects.push(Effect::PlayHistory(context.clone()));
        }
        self.add_track_to_player(session, target, Some(context)).await;
        Ok(())
    }

    /// Resume the loaded item, or start the active queue
    async fn resume(&self, session: &mut Session, offset: Option<&Offset>) -> Result<()> {
        if offset.is_none() && session.player.item.is_some() {
            session.player.is_playing = true;
            return Ok(());
        }

        let user_id = session.user_id().clone();
        let Some(active) = session.queue.as_mut() else {
            return Err(EncoreError::not_found("player item", user_id.as_str()));
        };
        let index = match (offset, active.current_index) {
            (Some(offset), _) => {
                let index = navigation::resolve_offset(active, Some(offset));
                queue::set_current(active, index);
                index
            }
            (None, Some(current)) => current,
            (None, None) => navigation::move_to(active, 0),
        };
        let Some(track) = active.tracks.get(index).cloned() else {
            return Err(EncoreError::not_found("player item", user_id.as_str()));
        };
        let context = active.context.clone();

        self.add_track_to_player(session, track, Some(context)).await;
        Ok(())
    }

    async fn item_duration(&self, item: &PlayableItem) -> Option<u64> {
        let duration = match item {
            PlayableItem::Track(id) => self
                .catalog
                .track(id)
                .await
                .map(|track| track.map(|t| t.duration_ms)),
            PlayableItem::Ad(id) => self.catalog.ad(id).await.map(|ad| ad.map(|a| a.duration_ms)),
        };
        duration.unwrap_or_else(|e| {
            tracing::warn!("Duration lookup failed for {:?}: {}", item, e);
            None
        })
    }
}

/// End an ad break and pick the queue back up where it was
///
/// The queue's current track already counted towards the ad when it was
/// requested, so it is started without counting again.
fn finish_ad(session: &mut Session) {
    let resume = session.queue.as_ref().and_then(|queue| {
        queue
            .current_track()
            .map(|track| (track.clone(), queue.context.clone()))
    });

    match resume {
        Some((track, context)) => player::start_track(&mut session.player, track, Some(context)),
        None => player::reset_to_default(&mut session.player),
    }
}
