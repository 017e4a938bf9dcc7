//! Next/previous stepping through a queue
//!
//! Stepping is split into a pure plan (`plan_step`) and its application
//! (`move_to`) so the engine can decide what to do when a queue is
//! exhausted before touching anything.

use crate::queue::position_of;
use encore_core::{Queue, RepeatState, TrackUri};
use serde::{Deserialize, Serialize};

/// Direction of a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// Result of planning a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Repeat-track: play the current track again
    Replay,

    /// Move to `position` in play order
    Move { position: usize, wrapped: bool },

    /// Ran off either end with repeat off
    Exhausted,
}

/// Where to start playing a freshly loaded queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Offset {
    /// Zero-based position in the loaded track list
    Position(usize),

    /// A `track:<id>` uri within the loaded track list
    Uri(String),
}

/// Position of the current track in play order
pub fn cursor(queue: &Queue) -> Option<usize> {
    if queue.is_shuffled() {
        queue.shuffle_index
    } else {
        queue.current_index
    }
}

/// Plan a step without mutating the queue
pub fn plan_step(queue: &Queue, direction: Direction, repeat: RepeatState) -> Step {
    let len = queue.len();
    if len == 0 {
        return Step::Exhausted;
    }

    let current = cursor(queue);
    if repeat == RepeatState::Track && current.is_some() {
        return Step::Replay;
    }

    let wrap = repeat == RepeatState::Context;
    match (current, direction) {
        (None, Direction::Next) => Step::Move {
            position: 0,
            wrapped: false,
        },
        (None, Direction::Previous) => Step::Move {
            position: len - 1,
            wrapped: false,
        },
        (Some(pos), Direction::Next) if pos + 1 < len => Step::Move {
            position: pos + 1,
            wrapped: false,
        },
        (Some(_), Direction::Next) if wrap => Step::Move {
            position: 0,
            wrapped: true,
        },
        (Some(pos), Direction::Previous) if pos > 0 => Step::Move {
            position: pos - 1,
            wrapped: false,
        },
        (Some(_), Direction::Previous) if wrap => Step::Move {
            position: len - 1,
            wrapped: true,
        },
        (Some(_), _) => Step::Exhausted,
    }
}

/// Move the cursor to `position` in play order; returns the real index
pub fn move_to(queue: &mut Queue, position: usize) -> usize {
    let index = match &queue.shuffle_list {
        Some(list) => {
            queue.shuffle_index = Some(position);
            list.get(position).copied().unwrap_or(position)
        }
        None => position,
    };
    queue.current_index = Some(index);
    index
}

/// Real index at which a freshly loaded queue should start
///
/// Out-of-range positions and unknown uris fall back to the first track.
pub fn resolve_offset(queue: &Queue, offset: Option<&Offset>) -> usize {
    match offset {
        Some(Offset::Position(position)) if *position < queue.len() => *position,
        Some(Offset::Uri(uri)) => TrackUri::parse(uri)
            .and_then(|uri| position_of(queue, uri.track_id()))
            .unwrap_or(0),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encore_core::{Context, TrackId, UserId};

    fn queue_of(n: usize) -> Queue {
        Queue::new(
            UserId::new("u1"),
            Context::Unknown,
            (0..n).map(|i| TrackId::new(format!("t{i}"))).collect(),
        )
    }

    #[test]
    fn next_from_middle_advances() {
        let mut queue = queue_of(3);
        queue.current_index = Some(1);
        assert_eq!(
            plan_step(&queue, Direction::Next, RepeatState::Off),
            Step::Move {
                position: 2,
                wrapped: false
            }
        );
    }

    #[test]
    fn next_at_end_wraps_only_with_repeat_context() {
        let mut queue = queue_of(3);
        queue.current_index = Some(2);

        assert_eq!(
            plan_step(&queue, Direction::Next, RepeatState::Off),
            Step::Exhausted
        );
        assert_eq!(
            plan_step(&queue, Direction::Next, RepeatState::Context),
            Step::Move {
                position: 0,
                wrapped: true
            }
        );
    }

    #[test]
    fn previous_at_start_wraps_to_end() {
        let mut queue = queue_of(4);
        queue.current_index = Some(0);

        assert_eq!(
            plan_step(&queue, Direction::Previous, RepeatState::Context),
            Step::Move {
                position: 3,
                wrapped: true
            }
        );
        assert_eq!(
            plan_step(&queue, Direction::Previous, RepeatState::Off),
            Step::Exhausted
        );
    }

    #[test]
    fn repeat_track_replays() {
        let mut queue = queue_of(2);
        queue.current_index = Some(1);
        assert_eq!(
            plan_step(&queue, Direction::Next, RepeatState::Track),
            Step::Replay
        );
        assert_eq!(
            plan_step(&queue, Direction::Previous, RepeatState::Track),
            Step::Replay
        );
    }

    #[test]
    fn no_current_starts_at_an_end() {
        let queue = queue_of(3);
        assert_eq!(
            plan_step(&queue, Direction::Next, RepeatState::Track),
            Step::Move {
                position: 0,
                wrapped: false
            }
        );
        assert_eq!(
            plan_step(&queue, Direction::Previous, RepeatState::Off),
            Step::Move {
                position: 2,
                wrapped: false
            }
        );
    }

    #[test]
    fn empty_queue_is_exhausted() {
        let queue = queue_of(0);
        assert_eq!(
            plan_step(&queue, Direction::Next, RepeatState::Context),
            Step::Exhausted
        );
    }

    #[test]
    fn shuffled_step_follows_shuffle_list() {
        let mut queue = queue_of(3);
        queue.shuffle_list = Some(vec![2, 0, 1]);
        queue.shuffle_index = Some(0);
        queue.current_index = Some(2);

        let Step::Move { position, .. } = plan_step(&queue, Direction::Next, RepeatState::Off)
        else {
            panic!("expected a move");
        };
        let index = move_to(&mut queue, position);

        assert_eq!(index, 0);
        assert_eq!(queue.shuffle_index, Some(1));
        assert_eq!(queue.current_index, Some(0));
    }

    #[test]
    fn offset_resolution_falls_back_to_first() {
        let queue = queue_of(3);
        assert_eq!(resolve_offset(&queue, None), 0);
        assert_eq!(resolve_offset(&queue, Some(&Offset::Position(2))), 2);
        assert_eq!(resolve_offset(&queue, Some(&Offset::Position(9))), 0);
        assert_eq!(
            resolve_offset(&queue, Some(&Offset::Uri("track:t1".into()))),
            1
        );
        assert_eq!(
            resolve_offset(&queue, Some(&Offset::Uri("track:zzz".into()))),
            0
        );
    }
}
