/// Player and queue API routes (`/api/me/player`)
use crate::{error::Result, middleware::AuthenticatedUser, state::AppState};
use axum::{
    extract::{Query, State},
    Json,
};
use encore_core::{DeviceId, Player, RepeatState};
use encore_playback::{CurrentlyPlaying, DeleteSelector, PlayRequest, QueueView};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct DeviceQuery {
    pub device_id: Option<DeviceId>,
}

#[derive(Debug, Deserialize)]
pub struct SeekQuery {
    pub position_ms: u64,
    pub device_id: Option<DeviceId>,
}

#[derive(Debug, Deserialize)]
pub struct RepeatQuery {
    pub state: RepeatState,
    pub device_id: Option<DeviceId>,
}

#[derive(Debug, Deserialize)]
pub struct ShuffleQuery {
    pub state: bool,
    pub device_id: Option<DeviceId>,
}

#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    pub device_id: DeviceId,
    /// `true` starts playback, `false` pauses, absent keeps the current state
    #[serde(default)]
    pub play: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct AddToQueueRequest {
    pub uris: Vec<String>,
    #[serde(default)]
    pub device_id: Option<DeviceId>,
}

#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub from_index: usize,
    pub to_index: usize,
}

#[derive(Debug, Deserialize)]
pub struct ProgressRequest {
    pub progress_ms: u64,
}

/// GET /api/me/player - Current playback state
pub async fn get_player(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Player>> {
    let player = app_state.engine.get_player(auth.user_id()).await?;
    Ok(Json(player))
}

/// GET /api/me/player/currently-playing - Playback state with item metadata
pub async fn currently_playing(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<CurrentlyPlaying>> {
    let current = app_state.engine.currently_playing(auth.user_id()).await?;
    Ok(Json(current))
}

/// PUT /api/me/player/play - Start a context or track list, or resume
pub async fn play(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    body: Option<Json<PlayRequest>>,
) -> Result<Json<Player>> {
    let request = body.map(|Json(request)| request).unwrap_or_default();
    let player = app_state.engine.play(auth.user_id(), &request).await?;
    Ok(Json(player))
}

/// PUT /api/me/player/pause
pub async fn pause(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Query(query): Query<DeviceQuery>,
) -> Result<Json<Player>> {
    let player = app_state
        .engine
        .pause(auth.user_id(), query.device_id.as_ref())
        .await?;
    Ok(Json(player))
}

/// PUT /api/me/player/seek?position_ms=
pub async fn seek(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Query(query): Query<SeekQuery>,
) -> Result<Json<Player>> {
    let player = app_state
        .engine
        .seek(auth.user_id(), query.position_ms, query.device_id.as_ref())
        .await?;
    Ok(Json(player))
}

/// PUT /api/me/player/repeat?state=off|track|context
pub async fn set_repeat(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Query(query): Query<RepeatQuery>,
) -> Result<Json<Player>> {
    let player = app_state
        .engine
        .set_repeat(auth.user_id(), query.state, query.device_id.as_ref())
        .await?;
    Ok(Json(player))
}

/// PUT /api/me/player/shuffle?state=true|false
pub async fn set_shuffle(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Query(query): Query<ShuffleQuery>,
) -> Result<Json<Player>> {
    let player = app_state
        .engine
        .set_shuffle(auth.user_id(), query.state, query.device_id.as_ref())
        .await?;
    Ok(Json(player))
}

/// POST /api/me/player/next
pub async fn next(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Query(query): Query<DeviceQuery>,
) -> Result<Json<Player>> {
    let player = app_state
        .engine
        .next(auth.user_id(), query.device_id.as_ref())
        .await?;
    Ok(Json(player))
}

/// POST /api/me/player/previous
pub async fn previous(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Query(query): Query<DeviceQuery>,
) -> Result<Json<Player>> {
    let player = app_state
        .engine
        .previous(auth.user_id(), query.device_id.as_ref())
        .await?;
    Ok(Json(player))
}

/// PUT /api/me/player - Transfer playback to another device
pub async fn transfer(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(request): Json<TransferRequest>,
) -> Result<Json<Player>> {
    let player = app_state
        .engine
        .transfer(auth.user_id(), &request.device_id, request.play)
        .await?;
    Ok(Json(player))
}

/// PUT /api/me/player/progress - Client position heartbeat
pub async fn report_progress(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(request): Json<ProgressRequest>,
) -> Result<Json<Player>> {
    let player = app_state
        .engine
        .report_progress(auth.user_id(), request.progress_ms)
        .await?;
    Ok(Json(player))
}

/// GET /api/me/player/queue
pub async fn get_queue(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<QueueView>> {
    let view = app_state.engine.get_queue(auth.user_id()).await?;
    Ok(Json(view))
}

/// POST /api/me/player/queue - Append tracks
pub async fn add_to_queue(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(request): Json<AddToQueueRequest>,
) -> Result<Json<QueueView>> {
    let view = app_state
        .engine
        .add_to_queue(auth.user_id(), &request.uris, request.device_id.as_ref())
        .await?;
    Ok(Json(view))
}

/// PUT /api/me/player/queue/position - Move one track
pub async fn edit_queue_position(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(request): Json<MoveRequest>,
) -> Result<Json<QueueView>> {
    let view = app_state
        .engine
        .edit_queue_position(auth.user_id(), request.from_index, request.to_index)
        .await?;
    Ok(Json(view))
}

/// DELETE /api/me/player/queue - Remove one track by index or id
pub async fn delete_from_queue(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(selector): Json<DeleteSelector>,
) -> Result<Json<QueueView>> {
    let view = app_state
        .engine
        .delete_from_queue(auth.user_id(), &selector)
        .await?;
    Ok(Json(view))
}
