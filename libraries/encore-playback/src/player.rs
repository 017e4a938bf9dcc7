//! Player state transitions
//!
//! Pure functions over `Player`; the engine decides when to call them and
//! persists the result.

use encore_core::{
    Actions, Ad, Context, CurrentlyPlayingType, EncoreError, PlayableItem, Player, RepeatState,
    Result, TrackId,
};

/// A user action that ad breaks can disable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Restriction {
    InterruptingPlayback,
    Pausing,
    Resuming,
    Seeking,
    SkippingNext,
    SkippingPrev,
    TogglingRepeatContext,
    TogglingRepeatTrack,
    TogglingShuffle,
    TransferringPlayback,
}

impl Restriction {
    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InterruptingPlayback => "interrupting_playback",
            Self::Pausing => "pausing",
            Self::Resuming => "resuming",
            Self::Seeking => "seeking",
            Self::SkippingNext => "skipping_next",
            Self::SkippingPrev => "skipping_prev",
            Self::TogglingRepeatContext => "toggling_repeat_context",
            Self::TogglingRepeatTrack => "toggling_repeat_track",
            Self::TogglingShuffle => "toggling_shuffle",
            Self::TransferringPlayback => "transferring_playback",
        }
    }

    fn is_disabled(self, actions: &Actions) -> bool {
        match self {
            Self::InterruptingPlayback => actions.interrupting_playback,
            Self::Pausing => actions.pausing,
            Self::Resuming => actions.resuming,
            Self::Seeking => actions.seeking,
            Self::SkippingNext => actions.skipping_next,
            Self::SkippingPrev => actions.skipping_prev,
            Self::TogglingRepeatContext => actions.toggling_repeat_context,
            Self::TogglingRepeatTrack => actions.toggling_repeat_track,
            Self::TogglingShuffle => actions.toggling_shuffle,
            Self::TransferringPlayback => actions.transferring_playback,
        }
    }

    /// Restriction guarding a change to `repeat`
    pub fn for_repeat(current: RepeatState, requested: RepeatState) -> Self {
        match (current, requested) {
            (_, RepeatState::Track) | (RepeatState::Track, RepeatState::Off) => {
                Self::TogglingRepeatTrack
            }
            _ => Self::TogglingRepeatContext,
        }
    }
}

/// Fail with `Restricted` if the player disables `action`
pub fn ensure_allowed(player: &Player, action: Restriction) -> Result<()> {
    match &player.actions {
        Some(actions) if action.is_disabled(actions) => {
            Err(EncoreError::restricted(action.as_str()))
        }
        _ => Ok(()),
    }
}

/// Count a track change towards the next ad; returns whether an ad is due
///
/// Only ad-supported players count, and only when `incoming` differs from
/// the loaded item. The counter resets when it reaches `interval`.
pub fn register_track_change(player: &mut Player, incoming: &TrackId, interval: u32) -> bool {
    let is_same = player.current_track() == Some(incoming);
    let Some(counter) = player.ads_counter.as_mut() else {
        return false;
    };
    if is_same {
        return false;
    }

    *counter += 1;
    if *counter >= interval.max(1) {
        *counter = 0;
        return true;
    }
    false
}

/// Load `track` and start playing it from the beginning
///
/// `context` overwrites the player's context when supplied.
pub fn start_track(player: &mut Player, track: TrackId, context: Option<Context>) {
    player.item = Some(PlayableItem::Track(track));
    player.progress_ms = Some(0);
    player.is_playing = true;
    player.currently_playing_type = CurrentlyPlayingType::Track;
    player.actions = None;
    if let Some(context) = context {
        player.context = context;
    }
}

/// Interrupt with an ad; every user action is disabled until it ends
pub fn start_ad(player: &mut Player, ad: &Ad) {
    player.item = Some(PlayableItem::Ad(ad.id.clone()));
    player.context = Context::Unknown;
    player.progress_ms = Some(0);
    player.is_playing = true;
    player.currently_playing_type = CurrentlyPlayingType::Ad;
    player.actions = Some(Actions::ad_break());
}

/// Return to the idle state; the ad counter and device survive
pub fn reset_to_default(player: &mut Player) {
    player.item = None;
    player.context = Context::Unknown;
    player.progress_ms = None;
    player.is_playing = false;
    player.shuffle_state = false;
    player.repeat_state = RepeatState::Off;
    player.currently_playing_type = CurrentlyPlayingType::Unknown;
    player.actions = None;
}

#[cfg(test)]
mod tests {
    use super::*;
    use encore_core::{AdId, AlbumId, UserId};

    fn ad() -> Ad {
        Ad {
            id: AdId::new("ad1"),
            title: "Buy things".into(),
            duration_ms: 15_000,
        }
    }

    #[test]
    fn free_players_never_count() {
        let mut player = Player::new(UserId::new("u1"), false);
        for i in 0..10 {
            assert!(!register_track_change(
                &mut player,
                &TrackId::new(format!("t{i}")),
                3
            ));
        }
        assert!(player.ads_counter.is_none());
    }

    #[test]
    fn third_change_is_due() {
        let mut player = Player::new(UserId::new("u1"), true);
        let due: Vec<bool> = (0..6)
            .map(|i| {
                let track = TrackId::new(format!("t{i}"));
                let due = register_track_change(&mut player, &track, 3);
                start_track(&mut player, track, None);
                due
            })
            .collect();
        assert_eq!(due, vec![false, false, true, false, false, true]);
        assert_eq!(player.ads_counter, Some(0));
    }

    #[test]
    fn replaying_same_track_does_not_count() {
        let mut player = Player::new(UserId::new("u1"), true);
        let track = TrackId::new("t1");
        register_track_change(&mut player, &track, 3);
        start_track(&mut player, track.clone(), None);

        assert!(!register_track_change(&mut player, &track, 3));
        assert_eq!(player.ads_counter, Some(1));
    }

    #[test]
    fn ad_restricts_actions() {
        let mut player = Player::new(UserId::new("u1"), true);
        start_ad(&mut player, &ad());

        assert!(player.in_ad_break());
        assert_eq!(player.currently_playing_type, CurrentlyPlayingType::Ad);
        assert!(matches!(
            ensure_allowed(&player, Restriction::SkippingNext),
            Err(EncoreError::Restricted(_))
        ));
    }

    #[test]
    fn start_track_lifts_restrictions_and_keeps_context_when_none() {
        let mut player = Player::new(UserId::new("u1"), true);
        player.context = Context::Album(AlbumId::new("al1"));
        start_ad(&mut player, &ad());
        player.context = Context::Album(AlbumId::new("al1"));

        start_track(&mut player, TrackId::new("t1"), None);

        assert!(player.actions.is_none());
        assert!(ensure_allowed(&player, Restriction::Seeking).is_ok());
        assert_eq!(player.context, Context::Album(AlbumId::new("al1")));
        assert_eq!(player.progress_ms, Some(0));
    }

    #[test]
    fn reset_keeps_counter_and_device() {
        let mut player = Player::new(UserId::new("u1"), true);
        player.ads_counter = Some(2);
        player.device_id = Some(encore_core::DeviceId::new("d1"));
        player.shuffle_state = true;
        player.repeat_state = RepeatState::Context;
        start_track(&mut player, TrackId::new("t1"), None);

        reset_to_default(&mut player);

        assert!(player.item.is_none());
        assert!(!player.is_playing);
        assert!(!player.shuffle_state);
        assert_eq!(player.repeat_state, RepeatState::Off);
        assert_eq!(player.ads_counter, Some(2));
        assert!(player.device_id.is_some());
    }

    #[test]
    fn repeat_restriction_mapping() {
        assert_eq!(
            Restriction::for_repeat(RepeatState::Off, RepeatState::Track),
            Restriction::TogglingRepeatTrack
        );
        assert_eq!(
            Restriction::for_repeat(RepeatState::Context, RepeatState::Off),
            Restriction::TogglingRepeatContext
        );
        assert_eq!(
            Restriction::for_repeat(RepeatState::Track, RepeatState::Off),
            Restriction::TogglingRepeatTrack
        );
    }
}
