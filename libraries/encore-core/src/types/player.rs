/// Player types: the per-user "now playing" record
use super::{AdId, Context, DeviceId, TrackId, UserId};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Repeat mode for playback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatState {
    #[default]
    Off,
    Track,
    Context,
}

impl RepeatState {
    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Track => "track",
            Self::Context => "context",
        }
    }

    /// Parse from string
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "off" => Some(Self::Off),
            "track" => Some(Self::Track),
            "context" => Some(Self::Context),
            _ => None,
        }
    }
}

impl std::fmt::Display for RepeatState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What kind of item the player currently holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurrentlyPlayingType {
    Track,
    Ad,
    #[default]
    Unknown,
}

impl CurrentlyPlayingType {
    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Track => "track",
            Self::Ad => "ad",
            Self::Unknown => "unknown",
        }
    }

    /// Parse from string
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "track" => Some(Self::Track),
            "ad" => Some(Self::Ad),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }
}

/// Reference to the item loaded in the player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum PlayableItem {
    Track(TrackId),
    Ad(AdId),
}

impl PlayableItem {
    /// Track id, when the item is a track
    pub fn track_id(&self) -> Option<&TrackId> {
        match self {
            Self::Track(id) => Some(id),
            Self::Ad(_) => None,
        }
    }

    /// Whether the item is an ad
    pub fn is_ad(&self) -> bool {
        matches!(self, Self::Ad(_))
    }
}

/// Capability restrictions signalled to clients
///
/// A `true` flag means the action is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Actions {
    pub interrupting_playback: bool,
    pub pausing: bool,
    pub resuming: bool,
    pub seeking: bool,
    pub skipping_next: bool,
    pub skipping_prev: bool,
    pub toggling_repeat_context: bool,
    pub toggling_shuffle: bool,
    pub toggling_repeat_track: bool,
    pub transferring_playback: bool,
}

impl Actions {
    /// Restrictions applied for the duration of an ad
    #[must_use]
    pub fn ad_break() -> Self {
        Self {
            interrupting_playback: true,
            pausing: true,
            resuming: true,
            seeking: true,
            skipping_next: true,
            skipping_prev: true,
            toggling_repeat_context: true,
            toggling_shuffle: true,
            toggling_repeat_track: true,
            transferring_playback: true,
        }
    }
}

/// A user's playback state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Owner of this record
    pub user_id: UserId,

    /// Last-used output device
    pub device_id: Option<DeviceId>,

    /// Currently loaded track or ad
    pub item: Option<PlayableItem>,

    /// Why the current item is playing
    pub context: Context,

    /// Position within `item`; `None` when nothing is loaded
    pub progress_ms: Option<u64>,

    pub is_playing: bool,

    pub shuffle_state: bool,

    pub repeat_state: RepeatState,

    pub currently_playing_type: CurrentlyPlayingType,

    /// Present only for ad-supported accounts
    pub ads_counter: Option<u32>,

    /// Set while an ad is playing
    pub actions: Option<Actions>,

    /// Optimistic-concurrency counter, bumped by every store save
    pub version: i64,

    /// Last update timestamp (Unix epoch seconds)
    pub updated_at: i64,
}

impl Player {
    /// Create the initial record for a new account
    pub fn new(user_id: UserId, ad_supported: bool) -> Self {
        Self {
            user_id,
            device_id: None,
            item: None,
            context: Context::Unknown,
            progress_ms: None,
            is_playing: false,
            shuffle_state: false,
            repeat_state: RepeatState::Off,
            currently_playing_type: CurrentlyPlayingType::Unknown,
            ads_counter: ad_supported.then_some(0),
            actions: None,
            version: 0,
            updated_at: Utc::now().timestamp(),
        }
    }

    /// Currently loaded track, if the item is a track
    pub fn current_track(&self) -> Option<&TrackId> {
        self.item.as_ref().and_then(PlayableItem::track_id)
    }

    /// Whether an ad break is in progress
    pub fn in_ad_break(&self) -> bool {
        self.actions.is_some() || self.currently_playing_type == CurrentlyPlayingType::Ad
    }
}
