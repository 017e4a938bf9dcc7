//! Queue mutation: append, remove, reorder
//!
//! Every mutation keeps `current_index`, `shuffle_list` and `shuffle_index`
//! pointing at the same track they pointed at before, so the track that
//! is playing keeps playing.

use encore_core::{EncoreError, Queue, Result, TrackId};

/// Outcome of removing a track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    /// The removed track
    pub track: TrackId,

    /// Whether the removed track was the current one
    pub was_current: bool,
}

/// Real index of `track`, if queued
pub fn position_of(queue: &Queue, track: &TrackId) -> Option<usize> {
    queue.tracks.iter().position(|t| t == track)
}

/// Make the track at real index `index` current
///
/// Keeps the shuffle cursor in step when shuffle is active.
pub fn set_current(queue: &mut Queue, index: usize) {
    queue.current_index = Some(index);
    if let Some(list) = &queue.shuffle_list {
        queue.shuffle_index = list.iter().position(|&i| i == index);
    }
}

/// Append tracks not already queued; returns how many were added
///
/// New tracks go to the end of the shuffle order too, so a shuffled
/// queue plays them after everything already scheduled.
pub fn append(queue: &mut Queue, tracks: impl IntoIterator<Item = TrackId>) -> usize {
    let start = queue.tracks.len();
    for track in tracks {
        if !queue.tracks.contains(&track) {
            queue.tracks.push(track);
        }
    }

    let end = queue.tracks.len();
    if let Some(list) = queue.shuffle_list.as_mut() {
        list.extend(start..end);
    }
    end - start
}

/// Remove the track at real index `index`
pub fn remove_at(queue: &mut Queue, index: usize) -> Result<Removal> {
    if index >= queue.len() {
        return Err(EncoreError::invalid_argument(format!(
            "track index {index} out of range (queue has {} tracks)",
            queue.len()
        )));
    }

    let track = queue.tracks.remove(index);
    let was_current = queue.current_index == Some(index);

    queue.current_index = match queue.current_index {
        Some(current) if current == index => None,
        Some(current) if current > index => Some(current - 1),
        other => other,
    };

    if let Some(list) = queue.shuffle_list.as_mut() {
        let removed_pos = list.iter().position(|&i| i == index);
        if let Some(pos) = removed_pos {
            list.remove(pos);
        }
        for entry in list.iter_mut() {
            if *entry > index {
                *entry -= 1;
            }
        }

        queue.shuffle_index = match (queue.shuffle_index, removed_pos) {
            _ if was_current => None,
            (Some(cursor), Some(pos)) if pos < cursor => Some(cursor - 1),
            (cursor, _) => cursor,
        };
    }

    Ok(Removal { track, was_current })
}

/// Move the track at `from` so it ends up at `to`
pub fn move_track(queue: &mut Queue, from: usize, to: usize) -> Result<()> {
    let len = queue.len();
    if from >= len || to >= len {
        return Err(EncoreError::invalid_argument(format!(
            "cannot move {from} -> {to} in a queue of {len} tracks"
        )));
    }
    if from == to {
        return Ok(());
    }

    let track = queue.tracks.remove(from);
    queue.tracks.insert(to, track);

    let remap = |i: usize| -> usize {
        if i == from {
            to
        } else if from < to && i > from && i <= to {
            i - 1
        } else if from > to && i >= to && i < from {
            i + 1
        } else {
            i
        }
    };

    queue.current_index = queue.current_index.map(remap);
    if let Some(list) = queue.shuffle_list.as_mut() {
        for entry in list.iter_mut() {
            *entry = remap(*entry);
        }
    }
    Ok(())
}
