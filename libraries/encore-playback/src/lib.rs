//! Encore Playback - Session engine
//!
//! Per-user playback sessions for Encore: one player, a queue of tracks
//! built from a context, and the rules that move between them.
//!
//! This crate provides:
//! - Queue navigation with repeat-track, repeat-context wraparound
//! - Fisher-Yates shuffle kept alongside the stored track order
//! - Continuation into related content when a queue runs out
//! - Ad cadence for ad-supported accounts
//! - A two-slot queue reference list with eviction
//! - `SessionEngine`, which runs every operation under a per-user lock
//!   with version-checked commits
//!
//! # Architecture
//!
//! The algorithms (`shuffle`, `queue`, `navigation`, `player`, `slots`) are
//! pure functions over `encore_core` types. `SessionEngine` wires them to
//! storage and the catalog through the traits in `encore_core`, so it runs
//! the same against SQLite or in-memory fakes.
//!
//! # Example: Navigation
//!
//! ```rust
//! use encore_core::{Context, Queue, RepeatState, TrackId, UserId};
//! use encore_playback::navigation::{move_to, plan_step, Direction, Step};
//!
//! let mut queue = Queue::new(
//!     UserId::new("alice"),
//!     Context::Unknown,
//!     vec![TrackId::new("t1"), TrackId::new("t2")],
//! );
//! queue.current_index = Some(1);
//!
//! // Wraps to the first track with repeat-context
//! let step = plan_step(&queue, Direction::Next, RepeatState::Context);
//! assert_eq!(step, Step::Move { position: 0, wrapped: true });
//!
//! if let Step::Move { position, .. } = step {
//!     move_to(&mut queue, position);
//! }
//! assert_eq!(queue.current_track(), Some(&TrackId::new("t1")));
//! ```

pub mod activity;
pub mod builder;
pub mod config;
pub mod continuation;
pub mod locks;
pub mod navigation;
pub mod player;
pub mod queue;
pub mod session;
pub mod shuffle;
pub mod slots;

pub use activity::ActivityDispatcher;
pub use builder::QueueBuilder;
pub use config::SessionConfig;
pub use continuation::{Continuation, ContinuationPlanner};
pub use navigation::{Direction, Offset, Step};
pub use session::{
    CurrentlyPlaying, DeleteSelector, PlayRequest, QueueView, SessionBackends, SessionEngine,
};
pub use slots::{Eviction, QueueSlots, QUEUE_SLOTS};
