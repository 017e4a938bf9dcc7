//! Request and response shapes for session operations
use crate::navigation::Offset;
use crate::queue::position_of;
use encore_core::{
    Ad, Context, DeviceId, EncoreError, PlayableItem, Player, Queue, QueueId, Result, Track,
    TrackId,
};
use serde::{Deserialize, Serialize};

/// Start or resume playback
///
/// With neither `context_uri` nor `uris` this resumes the loaded item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayRequest {
    /// `album:<id>`, `artist:<id>` or `playlist:<id>`
    #[serde(default)]
    pub context_uri: Option<String>,

    /// `track:<id>` uris
    #[serde(default)]
    pub uris: Option<Vec<String>>,

    #[serde(default)]
    pub offset: Option<Offset>,

    #[serde(default)]
    pub position_ms: Option<u64>,

    #[serde(default)]
    pub device_id: Option<DeviceId>,
}

/// Which queued track to delete; exactly one field must be set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteSelector {
    #[serde(default)]
    pub track_index: Option<usize>,

    #[serde(default)]
    pub track_id: Option<TrackId>,
}

impl DeleteSelector {
    /// Real index of the selected track in `queue`
    pub fn resolve(&self, queue: &Queue) -> Result<usize> {
        match (self.track_index, &self.track_id) {
            (Some(index), None) if index < queue.len() => Ok(index),
            (Some(index), None) => Err(EncoreError::invalid_argument(format!(
                "track index {index} out of range"
            ))),
            (None, Some(track_id)) => position_of(queue, track_id)
                .ok_or_else(|| EncoreError::not_found("queued track", track_id.as_str())),
            (Some(_), Some(_)) => Err(EncoreError::invalid_argument(
                "specify either track_index or track_id, not both",
            )),
            (None, None) => Err(EncoreError::invalid_argument(
                "one of track_index or track_id is required",
            )),
        }
    }
}

/// Snapshot of the active queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueView {
    pub queue_id: Option<QueueId>,
    pub context: Context,
    pub currently_playing: Option<PlayableItem>,
    pub current_index: Option<usize>,
    pub shuffled: bool,
    /// All tracks in stored order
    pub tracks: Vec<TrackId>,
    /// Tracks after the current one, in play order
    pub upcoming: Vec<TrackId>,
}

impl QueueView {
    pub fn new(player: &Player, queue: Option<&Queue>) -> Self {
        match queue {
            Some(queue) => Self {
                queue_id: Some(queue.id.clone()),
                context: queue.context.clone(),
                currently_playing: player.item.clone(),
                current_index: queue.current_index,
                shuffled: queue.is_shuffled(),
                tracks: queue.tracks.clone(),
                upcoming: queue.upcoming(),
            },
            None => Self {
                queue_id: None,
                context: Context::Unknown,
                currently_playing: player.item.clone(),
                current_index: None,
                shuffled: false,
                tracks: Vec::new(),
                upcoming: Vec::new(),
            },
        }
    }
}

/// Player state with the loaded item's catalog details
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentlyPlaying {
    #[serde(flatten)]
    pub player: Player,
    pub track: Option<Track>,
    pub ad: Option<Ad>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use encore_core::UserId;

    fn queue() -> Queue {
        Queue::new(
            UserId::new("u1"),
            Context::Unknown,
            vec![TrackId::new("a"), TrackId::new("b")],
        )
    }

    #[test]
    fn selector_requires_exactly_one_field() {
        let queue = queue();
        assert!(DeleteSelector::default().resolve(&queue).is_err());
        let both = DeleteSelector {
            track_index: Some(0),
            track_id: Some(TrackId::new("a")),
        };
        assert!(matches!(
            both.resolve(&queue),
            Err(EncoreError::InvalidArgument(_))
        ));
    }

    #[test]
    fn selector_by_id_and_index() {
        let queue = queue();
        let by_id = DeleteSelector {
            track_index: None,
            track_id: Some(TrackId::new("b")),
        };
        assert_eq!(by_id.resolve(&queue).unwrap(), 1);

        let missing = DeleteSelector {
            track_index: None,
            track_id: Some(TrackId::new("z")),
        };
        assert!(matches!(
            missing.resolve(&queue),
            Err(EncoreError::NotFound { .. })
        ));

        let out_of_range = DeleteSelector {
            track_index: Some(2),
            track_id: None,
        };
        assert!(out_of_range.resolve(&queue).is_err());
    }

    #[test]
    fn play_request_accepts_offset_shapes() {
        let request: PlayRequest = serde_json::from_str(
            r#"{"context_uri":"album:al1","offset":{"position":3},"position_ms":1000}"#,
        )
        .unwrap();
        assert_eq!(request.offset, Some(Offset::Position(3)));
        assert_eq!(request.position_ms, Some(1000));

        let request: PlayRequest =
            serde_json::from_str(r#"{"uris":["track:t1"],"offset":{"uri":"track:t1"}}"#).unwrap();
        assert_eq!(request.offset, Some(Offset::Uri("track:t1".into())));
    }
}
