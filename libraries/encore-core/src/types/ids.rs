/// ID types for Encore entities
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create an ID from an existing string
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generate a new random ID
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Get the inner string
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

string_id!(
    /// User identifier
    UserId
);
string_id!(
    /// Track identifier
    TrackId
);
string_id!(
    /// Album identifier
    AlbumId
);
string_id!(
    /// Artist identifier
    ArtistId
);
string_id!(
    /// Playlist identifier
    PlaylistId
);
string_id!(
    /// Queue identifier (opaque, generated on creation)
    QueueId
);
string_id!(
    /// Output device identifier
    DeviceId
);
string_id!(
    /// Advertisement identifier
    AdId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_id_generation_creates_unique_ids() {
        let id1 = QueueId::generate();
        let id2 = QueueId::generate();
        assert_ne!(id1, id2);
    }

    #[test]
    fn track_id_from_string() {
        let id = TrackId::new("track-123");
        assert_eq!(id.as_str(), "track-123");
    }

    #[test]
    fn ids_serialize_transparently() {
        let id = PlaylistId::new("playlist-456");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"playlist-456\"");
        assert_eq!(format!("{}", id), "playlist-456");
    }
}
