/// Shared application state
use crate::services::AuthService;
use encore_playback::SessionEngine;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<SessionEngine>,
    pub auth_service: Arc<AuthService>,
}

impl AppState {
    pub fn new(engine: Arc<SessionEngine>, auth_service: Arc<AuthService>) -> Self {
        Self {
            engine,
            auth_service,
        }
    }
}
