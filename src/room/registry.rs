use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use super::models::{random_id, Deck, Room, ROOM_ID_LEN};
use crate::shared::AppError;

/// Trait for room registry operations.
///
/// Every method is atomic with respect to the room it touches: a caller never
/// observes a half-applied update, and failed operations mutate nothing.
#[async_trait]
pub trait RoomRegistry {
    /// Creates a room with a fresh id and returns the id.
    async fn create_room(&self) -> Result<String, AppError>;

    /// Adds a participant under the given display name, returning the fresh
    /// participant id. The id is the caller's credential for voting.
    async fn join_room(&self, room_id: &str, name: &str) -> Result<String, AppError>;

    /// Returns a consistent point-in-time copy of the room.
    async fn snapshot(&self, room_id: &str) -> Result<Room, AppError>;

    /// Records a vote for a current participant, overwriting any prior vote.
    /// Values are free-form; the active deck is never consulted.
    async fn cast_vote(
        &self,
        room_id: &str,
        participant_id: &str,
        value: String,
    ) -> Result<(), AppError>;

    /// Makes all votes and the summary visible. Idempotent.
    async fn reveal(&self, room_id: &str) -> Result<(), AppError>;

    /// Starts a new round: clears votes, hides results. Idempotent.
    async fn reset(&self, room_id: &str) -> Result<(), AppError>;

    /// Switches the room's deck. Votes and the revealed flag are untouched.
    async fn set_deck(&self, room_id: &str, deck: Deck) -> Result<(), AppError>;

    /// Replaces the story label. The caller is expected to pass trimmed text.
    async fn set_story(&self, room_id: &str, story: &str) -> Result<(), AppError>;
}

/// In-memory implementation of RoomRegistry.
///
/// One mutex over the whole map; every operation takes it for its full
/// read-modify-write, which is plenty at planning-poker request volumes.
pub struct InMemoryRoomRegistry {
    rooms: Mutex<HashMap<String, Room>>,
}

impl Default for InMemoryRoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRoomRegistry {
    /// Creates a new empty registry
    pub fn new() -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
        }
    }

    /// Runs `f` against the room while holding the registry lock.
    fn with_room<T>(
        &self,
        room_id: &str,
        f: impl FnOnce(&mut Room) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let mut rooms = self.rooms.lock().unwrap();
        match rooms.get_mut(room_id) {
            Some(room) => f(room),
            None => {
                debug!(room_id = %room_id, "Room not found");
                Err(AppError::RoomNotFound)
            }
        }
    }
}

#[async_trait]
impl RoomRegistry for InMemoryRoomRegistry {
    #[instrument(skip(self))]
    async fn create_room(&self) -> Result<String, AppError> {
        let mut rooms = self.rooms.lock().unwrap();

        // Regenerate on collision; the id space (~36^5) makes retries rare,
        // but two concurrent creates must never share an id.
        let room_id = loop {
            let candidate = random_id(ROOM_ID_LEN);
            if !rooms.contains_key(&candidate) {
                break candidate;
            }
            warn!(room_id = %candidate, "Room id collision, regenerating");
        };

        rooms.insert(room_id.clone(), Room::new());
        info!(room_id = %room_id, "Room created");
        Ok(room_id)
    }

    #[instrument(skip(self))]
    async fn join_room(&self, room_id: &str, name: &str) -> Result<String, AppError> {
        self.with_room(room_id, |room| {
            let participant_id = room.add_participant(name.to_string());
            info!(
                room_id = %room_id,
                participant_id = %participant_id,
                name = %name,
                participant_count = room.participants.len(),
                "Participant joined room"
            );
            Ok(participant_id)
        })
    }

    #[instrument(skip(self))]
    async fn snapshot(&self, room_id: &str) -> Result<Room, AppError> {
        self.with_room(room_id, |room| Ok(room.clone()))
    }

    #[instrument(skip(self, value))]
    async fn cast_vote(
        &self,
        room_id: &str,
        participant_id: &str,
        value: String,
    ) -> Result<(), AppError> {
        self.with_room(room_id, |room| {
            if !room.has_participant(participant_id) {
                debug!(room_id = %room_id, participant_id = %participant_id, "Participant not in room");
                return Err(AppError::ParticipantNotInRoom);
            }
            room.votes.insert(participant_id.to_string(), value);
            debug!(room_id = %room_id, participant_id = %participant_id, "Vote recorded");
            Ok(())
        })
    }

    #[instrument(skip(self))]
    async fn reveal(&self, room_id: &str) -> Result<(), AppError> {
        self.with_room(room_id, |room| {
            room.revealed = true;
            info!(room_id = %room_id, vote_count = room.votes.len(), "Votes revealed");
            Ok(())
        })
    }

    #[instrument(skip(self))]
    async fn reset(&self, room_id: &str) -> Result<(), AppError> {
        self.with_room(room_id, |room| {
            room.reset_round();
            info!(room_id = %room_id, "Round reset");
            Ok(())
        })
    }

    #[instrument(skip(self))]
    async fn set_deck(&self, room_id: &str, deck: Deck) -> Result<(), AppError> {
        self.with_room(room_id, |room| {
            room.deck = deck;
            info!(room_id = %room_id, deck = %deck, "Deck changed");
            Ok(())
        })
    }

    #[instrument(skip(self))]
    async fn set_story(&self, room_id: &str, story: &str) -> Result<(), AppError> {
        self.with_room(room_id, |room| {
            room.story = story.to_string();
            debug!(room_id = %room_id, "Story updated");
            Ok(())
        })
    }
}
