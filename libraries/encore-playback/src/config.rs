//! Session engine tuning
use serde::{Deserialize, Serialize};

/// Session engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Track changes between ads for ad-supported players
    #[serde(default = "default_ad_interval")]
    pub ad_interval: u32,

    /// Related entities fetched when planning a continuation
    #[serde(default = "default_continuation_candidates")]
    pub continuation_candidates: usize,

    /// Tracks used for an artist with no curated popular list
    #[serde(default = "default_artist_top_tracks")]
    pub artist_top_tracks: usize,

    /// Attempts per operation when a version check fails
    #[serde(default = "default_conflict_retries")]
    pub conflict_retries: usize,
}

fn default_ad_interval() -> u32 {
    3
}

fn default_continuation_candidates() -> usize {
    20
}

fn default_artist_top_tracks() -> usize {
    10
}

fn default_conflict_retries() -> usize {
    3
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ad_interval: default_ad_interval(),
            continuation_candidates: default_continuation_candidates(),
            artist_top_tracks: default_artist_top_tracks(),
            conflict_retries: default_conflict_retries(),
        }
    }
}
