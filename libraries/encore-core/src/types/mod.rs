mod catalog;
mod context;
mod device;
mod ids;
mod player;
mod queue;
mod uri;

pub use catalog::{Ad, Track};
pub use context::Context;
pub use device::{Device, DeviceType};
pub use ids::{AdId, AlbumId, ArtistId, DeviceId, PlaylistId, QueueId, TrackId, UserId};
pub use player::{Actions, CurrentlyPlayingType, PlayableItem, Player, RepeatState};
pub use queue::Queue;
pub use uri::TrackUri;
