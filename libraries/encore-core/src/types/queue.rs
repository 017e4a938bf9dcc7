/// Queue types: the ordered track backlog of one playback context
use super::{Context, QueueId, TrackId, UserId};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Ordered track backlog for one playback context
///
/// `tracks` order is the normal-mode play order. While shuffle is active,
/// `shuffle_list` holds a permutation of `0..tracks.len()` and
/// `shuffle_index` points into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Queue {
    pub id: QueueId,

    /// Owner; queues are never shared between users
    pub user_id: UserId,

    pub tracks: Vec<TrackId>,

    pub context: Context,

    /// Real index of the track mirrored into `Player.item`
    pub current_index: Option<usize>,

    pub shuffle_list: Option<Vec<usize>>,

    pub shuffle_index: Option<usize>,

    /// Optimistic-concurrency counter, bumped by every store save
    pub version: i64,

    /// Creation timestamp (Unix epoch seconds)
    pub created_at: i64,

    /// Last update timestamp (Unix epoch seconds)
    pub updated_at: i64,
}

impl Queue {
    /// Create a fresh queue with no current position
    pub fn new(user_id: UserId, context: Context, tracks: Vec<TrackId>) -> Self {
        let now = Utc::now().timestamp();
        Self {
            id: QueueId::generate(),
            user_id,
            tracks,
            context,
            current_index: None,
            shuffle_list: None,
            shuffle_index: None,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the queue holds no tracks
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Whether shuffle order is active
    pub fn is_shuffled(&self) -> bool {
        self.shuffle_list.is_some()
    }

    /// Track at the current index
    pub fn current_track(&self) -> Option<&TrackId> {
        self.current_index.and_then(|i| self.tracks.get(i))
    }

    /// Real track indices in play order (shuffle order when shuffled)
    pub fn play_order(&self) -> Vec<usize> {
        match &self.shuffle_list {
            Some(list) => list.clone(),
            None => (0..self.tracks.len()).collect(),
        }
    }

    /// Tracks that will play after the current one, in play order
    ///
    /// With no current track the whole play order is upcoming.
    pub fn upcoming(&self) -> Vec<TrackId> {
        let order = self.play_order();
        let start = match (&self.shuffle_list, self.shuffle_index, self.current_index) {
            (Some(_), Some(pos), _) => pos + 1,
            (None, _, Some(current)) => current + 1,
            _ => 0,
        };

        order
            .into_iter()
            .skip(start)
            .filter_map(|i| self.tracks.get(i).cloned())
            .collect()
    }
}
