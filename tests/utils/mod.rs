use std::sync::Arc;

use axum::{
    body::Body,
    http::{self, Request, StatusCode},
    response::Response,
    Router,
};
use serde::de::DeserializeOwned;
use tower::ServiceExt;

use storypoints::room::{
    self,
    types::{CreateRoomResponse, JoinRoomResponse, RoomStateResponse},
};
use storypoints::{AppState, InMemoryRoomRegistry};

/// In-process client driving a fresh server instance through its router.
///
/// Each call clones the router and performs one `oneshot` request, the same
/// way the real server would handle it.
#[derive(Clone)]
pub struct TestApp {
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let state = AppState::new(Arc::new(InMemoryRoomRegistry::new()));
        Self {
            router: room::routes().with_state(state),
        }
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(http::header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn create_room(&self) -> String {
        let response = self.request("POST", "/api/rooms", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        json_body::<CreateRoomResponse>(response).await.room_id
    }

    pub async fn join(&self, room_id: &str, name: &str) -> JoinRoomResponse {
        let response = self
            .request(
                "POST",
                &format!("/api/rooms/{room_id}/join"),
                Some(serde_json::json!({ "name": name })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        json_body(response).await
    }

    pub async fn vote(
        &self,
        room_id: &str,
        user_id: &str,
        value: serde_json::Value,
    ) -> StatusCode {
        let response = self
            .request(
                "POST",
                &format!("/api/rooms/{room_id}/vote"),
                Some(serde_json::json!({ "user_id": user_id, "value": value })),
            )
            .await;
        response.status()
    }

    pub async fn reveal(&self, room_id: &str) {
        let response = self
            .request("POST", &format!("/api/rooms/{room_id}/reveal"), None)
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    pub async fn reset(&self, room_id: &str) {
        let response = self
            .request("POST", &format!("/api/rooms/{room_id}/reset"), None)
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    pub async fn set_deck(&self, room_id: &str, deck: &str) -> Response {
        self.request(
            "POST",
            &format!("/api/rooms/{room_id}/deck"),
            Some(serde_json::json!({ "deck": deck })),
        )
        .await
    }

    pub async fn set_story(&self, room_id: &str, story: &str) -> Response {
        self.request(
            "POST",
            &format!("/api/rooms/{room_id}/story"),
            Some(serde_json::json!({ "story": story })),
        )
        .await
    }

    pub async fn state(&self, room_id: &str) -> RoomStateResponse {
        let response = self
            .request("GET", &format!("/api/rooms/{room_id}/state"), None)
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        json_body(response).await
    }
}

pub async fn json_body<T: DeserializeOwned>(response: Response) -> T {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
