use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::room::registry::RoomRegistry;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub room_registry: Arc<dyn RoomRegistry + Send + Sync>,
}

impl AppState {
    pub fn new(room_registry: Arc<dyn RoomRegistry + Send + Sync>) -> Self {
        Self { room_registry }
    }
}

/// Client-input errors surfaced by the room registry.
///
/// All of them are terminal for the request and leave no partial side
/// effects; there are no transient failure modes in an in-memory store.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Room not found")]
    RoomNotFound,

    #[error("User not in room")]
    ParticipantNotInRoom,

    #[error("Unknown deck")]
    UnknownDeck,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::RoomNotFound => StatusCode::NOT_FOUND,
            AppError::ParticipantNotInRoom | AppError::UnknownDeck => StatusCode::BAD_REQUEST,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}
