/// Core error types for Encore
use thiserror::Error;

/// Result type alias using `EncoreError`
pub type Result<T> = std::result::Result<T, EncoreError>;

/// Core error type for Encore
#[derive(Error, Debug)]
pub enum EncoreError {
    /// No caller identity attached to the request
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Entity not found (player, queue, device, track, context entity)
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Ambiguous or missing selector, out-of-range index
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Action disabled while an ad is playing
    #[error("Action restricted: {0}")]
    Restricted(String),

    /// Concurrent modification detected by a version check
    #[error("Concurrent modification of {entity} {id}")]
    Conflict { entity: String, id: String },

    /// The continuation planner found no related content
    #[error("No continuation available")]
    ContinuationUnavailable,

    /// Best-effort collaborator failure (catalog, history, play counts)
    #[error("Collaborator failure: {0}")]
    Collaborator(String),

    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl EncoreError {
    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a conflict error
    pub fn conflict(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::Conflict {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create a restricted-action error
    pub fn restricted(action: impl Into<String>) -> Self {
        Self::Restricted(action.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a collaborator error
    pub fn collaborator(msg: impl Into<String>) -> Self {
        Self::Collaborator(msg.into())
    }

    /// Whether the operation may succeed if retried from a fresh load
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}
