mod room;
mod shared;

use room::registry::InMemoryRoomRegistry;
use shared::AppState;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storypoints=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting planning poker server");

    // Rooms live in memory for the life of the process; nothing to persist
    let room_registry = Arc::new(InMemoryRoomRegistry::new());
    let app_state = AppState::new(room_registry);

    // JSON API plus the static client at the root path
    let app = room::routes()
        .fallback_service(ServeDir::new("static"))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .unwrap();
    info!("Server running on http://localhost:{port}");
    axum::serve(listener, app).await.unwrap();
}
