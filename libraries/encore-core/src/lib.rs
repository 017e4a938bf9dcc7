//! Encore Core
//!
//! Domain types, traits, and error handling shared by every Encore crate.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Player`, `Queue`, `Context`, `Track`, `Device`, `Ad`
//! - **Store Traits**: `PlayerStore`, `QueueStore`, `QueueRefStore`
//! - **Collaborator Traits**: `Catalog`, `DeviceDirectory`, `ActivitySink`
//! - **Error Handling**: Unified `EncoreError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use encore_core::types::{Context, Player, PlaylistId, UserId};
//!
//! let player = Player::new(UserId::new("alice"), true);
//! assert!(player.item.is_none());
//! assert_eq!(player.ads_counter, Some(0));
//!
//! let context = Context::Playlist(PlaylistId::new("p1"));
//! assert_eq!(context.kind(), "playlist");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod storage;
pub mod traits;
pub mod types;

pub use error::{EncoreError, Result};
pub use storage::{PlayerStore, QueueRefStore, QueueStore};
pub use traits::{ActivitySink, Catalog, DeviceDirectory};

pub use types::{
    Actions, Ad, AdId, AlbumId, ArtistId, Context, CurrentlyPlayingType, Device, DeviceId,
    DeviceType, PlayableItem, Player, PlaylistId, Queue, QueueId, RepeatState, Track, TrackId,
    TrackUri, UserId,
};
