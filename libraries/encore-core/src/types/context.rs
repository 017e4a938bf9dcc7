/// Playback context: why a queue's tracks were assembled
use super::{AlbumId, ArtistId, PlaylistId};
use serde::{Deserialize, Serialize};

/// Playback context
///
/// Serialized as `{ "type": "album", "id": "..." }`; `Unknown` carries no id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum Context {
    Album(AlbumId),
    Artist(ArtistId),
    Playlist(PlaylistId),
    /// Ad-hoc track list, ad break, or reset player
    #[default]
    Unknown,
}

impl Context {
    /// Context type name (`album`, `artist`, `playlist`, `unknown`)
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Album(_) => "album",
            Self::Artist(_) => "artist",
            Self::Playlist(_) => "playlist",
            Self::Unknown => "unknown",
        }
    }

    /// Entity id, if the context refers to one
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Album(id) => Some(id.as_str()),
            Self::Artist(id) => Some(id.as_str()),
            Self::Playlist(id) => Some(id.as_str()),
            Self::Unknown => None,
        }
    }

    /// Whether this context is `Unknown`
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Rebuild a context from its stored parts
    ///
    /// Unrecognized types and missing ids decode to `Unknown`.
    pub fn from_parts(kind: &str, id: Option<&str>) -> Self {
        match (kind, id) {
            ("album", Some(id)) => Self::Album(AlbumId::new(id)),
            ("artist", Some(id)) => Self::Artist(ArtistId::new(id)),
            ("playlist", Some(id)) => Self::Playlist(PlaylistId::new(id)),
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.id() {
            Some(id) => write!(f, "{}:{}", self.kind(), id),
            None => write!(f, "{}", self.kind()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_type_and_id() {
        let json = serde_json::to_value(Context::Album(AlbumId::new("a1"))).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "album", "id": "a1" }));

        let json = serde_json::to_value(Context::Unknown).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "unknown" }));
    }

    #[test]
    fn parts_round_trip() {
        let ctx = Context::Playlist(PlaylistId::new("p9"));
        assert_eq!(Context::from_parts(ctx.kind(), ctx.id()), ctx);
        assert_eq!(Context::from_parts("genre", Some("x")), Context::Unknown);
        assert_eq!(Context::from_parts("album", None), Context::Unknown);
    }
}
