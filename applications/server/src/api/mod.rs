/// API route modules
pub mod health;
pub mod player;

use crate::{middleware, state::AppState};
use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Build the full `/api` router
pub fn create_router(app_state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new().route("/health", get(health::health));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/me/player", get(player::get_player).put(player::transfer))
        .route("/me/player/currently-playing", get(player::currently_playing))
        .route("/me/player/play", put(player::play))
        .route("/me/player/pause", put(player::pause))
        .route("/me/player/seek", put(player::seek))
        .route("/me/player/repeat", put(player::set_repeat))
        .route("/me/player/shuffle", put(player::set_shuffle))
        .route("/me/player/next", post(player::next))
        .route("/me/player/previous", post(player::previous))
        .route("/me/player/progress", put(player::report_progress))
        .route(
            "/me/player/queue",
            get(player::get_queue)
                .post(player::add_to_queue)
                .delete(player::delete_from_queue),
        )
        .route("/me/player/queue/position", put(player::edit_queue_position))
        .layer(axum_middleware::from_fn_with_state(
            Arc::clone(&app_state.auth_service),
            middleware::auth_middleware,
        ));

    Router::new()
        .nest("/api", public_routes.merge(protected_routes))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
