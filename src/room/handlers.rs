use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    service::RoomService,
    types::{
        Ack, CreateRoomResponse, JoinRoomRequest, JoinRoomResponse, RoomStateResponse,
        SetDeckRequest, SetDeckResponse, SetStoryRequest, VoteRequest,
    },
};
use crate::shared::{AppError, AppState};

/// All room routes, mirroring the JSON API the client polls against
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/rooms", post(create_room))
        .route("/api/rooms/:room_id/join", post(join_room))
        .route("/api/rooms/:room_id/state", get(room_state))
        .route("/api/rooms/:room_id/vote", post(cast_vote))
        .route("/api/rooms/:room_id/reveal", post(reveal))
        .route("/api/rooms/:room_id/reset", post(reset))
        .route("/api/rooms/:room_id/deck", post(set_deck))
        .route("/api/rooms/:room_id/story", post(set_story))
}

/// POST /api/rooms
#[instrument(name = "create_room", skip(state))]
async fn create_room(
    State(state): State<AppState>,
) -> Result<Json<CreateRoomResponse>, AppError> {
    let service = RoomService::new(Arc::clone(&state.room_registry));
    let response = service.create_room().await?;

    info!(room_id = %response.room_id, "Room created");
    Ok(Json(response))
}

/// POST /api/rooms/:room_id/join
///
/// The body is optional; a missing or blank name joins as "Guest".
#[instrument(name = "join_room", skip(state, body))]
async fn join_room(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    body: Option<Json<JoinRoomRequest>>,
) -> Result<Json<JoinRoomResponse>, AppError> {
    let request = body.map(|Json(request)| request).unwrap_or_default();

    let service = RoomService::new(Arc::clone(&state.room_registry));
    let response = service.join_room(&room_id, request).await?;

    info!(room_id = %room_id, user_id = %response.user_id, name = %response.name, "Joined room");
    Ok(Json(response))
}

/// GET /api/rooms/:room_id/state
#[instrument(name = "room_state", skip(state))]
async fn room_state(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomStateResponse>, AppError> {
    let service = RoomService::new(Arc::clone(&state.room_registry));
    let response = service.room_state(&room_id).await?;
    Ok(Json(response))
}

/// POST /api/rooms/:room_id/vote
#[instrument(name = "cast_vote", skip(state, request))]
async fn cast_vote(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    Json(request): Json<VoteRequest>,
) -> Result<Json<Ack>, AppError> {
    let service = RoomService::new(Arc::clone(&state.room_registry));
    let response = service.cast_vote(&room_id, request).await?;
    Ok(Json(response))
}

/// POST /api/rooms/:room_id/reveal
#[instrument(name = "reveal", skip(state))]
async fn reveal(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<Json<Ack>, AppError> {
    let service = RoomService::new(Arc::clone(&state.room_registry));
    let response = service.reveal(&room_id).await?;
    Ok(Json(response))
}

/// POST /api/rooms/:room_id/reset
#[instrument(name = "reset", skip(state))]
async fn reset(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<Json<Ack>, AppError> {
    let service = RoomService::new(Arc::clone(&state.room_registry));
    let response = service.reset(&room_id).await?;
    Ok(Json(response))
}

/// POST /api/rooms/:room_id/deck
#[instrument(name = "set_deck", skip(state, request))]
async fn set_deck(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    Json(request): Json<SetDeckRequest>,
) -> Result<Json<SetDeckResponse>, AppError> {
    let service = RoomService::new(Arc::clone(&state.room_registry));
    let response = service.set_deck(&room_id, request).await?;
    Ok(Json(response))
}

/// POST /api/rooms/:room_id/story
#[instrument(name = "set_story", skip(state, body))]
async fn set_story(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    body: Option<Json<SetStoryRequest>>,
) -> Result<Json<Ack>, AppError> {
    let request = body.map(|Json(request)| request).unwrap_or_default();

    let service = RoomService::new(Arc::clone(&state.room_registry));
    let response = service.set_story(&room_id, request).await?;
    Ok(Json(response))
}
