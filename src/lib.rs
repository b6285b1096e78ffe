// Library crate for the planning poker server
// This file exposes the public API for integration tests

pub mod room;
pub mod shared;

// Re-export commonly used types for easier access in tests
pub use room::models::{Deck, Room};
pub use room::registry::{InMemoryRoomRegistry, RoomRegistry};
pub use shared::{AppError, AppState};
