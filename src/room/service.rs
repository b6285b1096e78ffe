use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use super::{
    models::{Deck, Room},
    registry::RoomRegistry,
    types::{
        Ack, CreateRoomResponse, JoinRoomRequest, JoinRoomResponse, ParticipantView,
        RoomStateResponse, SetDeckRequest, SetDeckResponse, SetStoryRequest, VoteRequest,
    },
};
use crate::shared::AppError;

/// Display name used when a joiner supplies none
const DEFAULT_NAME: &str = "Guest";

/// Service layer between the HTTP handlers and the registry: applies input
/// defaults/coercion and shapes registry state into response types.
pub struct RoomService {
    registry: Arc<dyn RoomRegistry + Send + Sync>,
}

impl RoomService {
    pub fn new(registry: Arc<dyn RoomRegistry + Send + Sync>) -> Self {
        Self { registry }
    }

    #[instrument(skip(self))]
    pub async fn create_room(&self) -> Result<CreateRoomResponse, AppError> {
        let room_id = self.registry.create_room().await?;
        Ok(CreateRoomResponse { room_id })
    }

    /// Joins a room, defaulting blank display names to "Guest".
    #[instrument(skip(self, request))]
    pub async fn join_room(
        &self,
        room_id: &str,
        request: JoinRoomRequest,
    ) -> Result<JoinRoomResponse, AppError> {
        let name = match request.name {
            Some(name) if !name.is_empty() => name,
            _ => DEFAULT_NAME.to_string(),
        };

        let user_id = self.registry.join_room(room_id, &name).await?;
        Ok(JoinRoomResponse {
            user_id,
            room_id: room_id.to_string(),
            name,
        })
    }

    /// Builds the pollable view of a room from an atomic snapshot.
    #[instrument(skip(self))]
    pub async fn room_state(&self, room_id: &str) -> Result<RoomStateResponse, AppError> {
        let room = self.registry.snapshot(room_id).await?;
        Ok(room_state_view(room_id, &room))
    }

    #[instrument(skip(self, request))]
    pub async fn cast_vote(&self, room_id: &str, request: VoteRequest) -> Result<Ack, AppError> {
        let value = scalar_to_string(&request.value);
        self.registry
            .cast_vote(room_id, &request.user_id, value)
            .await?;
        Ok(Ack::ok())
    }

    #[instrument(skip(self))]
    pub async fn reveal(&self, room_id: &str) -> Result<Ack, AppError> {
        self.registry.reveal(room_id).await?;
        Ok(Ack::ok())
    }

    #[instrument(skip(self))]
    pub async fn reset(&self, room_id: &str) -> Result<Ack, AppError> {
        self.registry.reset(room_id).await?;
        Ok(Ack::ok())
    }

    /// Switches decks. The deck name is validated before the room lookup, so
    /// an unknown name fails with UnknownDeck even for unknown rooms.
    #[instrument(skip(self, request))]
    pub async fn set_deck(
        &self,
        room_id: &str,
        request: SetDeckRequest,
    ) -> Result<SetDeckResponse, AppError> {
        let deck = Deck::from_str(&request.deck).map_err(|_| {
            debug!(deck = %request.deck, "Unknown deck name");
            AppError::UnknownDeck
        })?;

        self.registry.set_deck(room_id, deck).await?;
        info!(room_id = %room_id, deck = %deck, "Deck switched");
        Ok(SetDeckResponse { ok: true, deck })
    }

    /// Stores the story label, trimmed of surrounding whitespace.
    #[instrument(skip(self, request))]
    pub async fn set_story(
        &self,
        room_id: &str,
        request: SetStoryRequest,
    ) -> Result<Ack, AppError> {
        let story = request.story.unwrap_or_default();
        self.registry.set_story(room_id, story.trim()).await?;
        Ok(Ack::ok())
    }
}

/// Coerces any JSON scalar to the string form stored as a vote.
///
/// Strings are taken verbatim; everything else uses its JSON rendering
/// (5 -> "5", true -> "true", null -> "null").
fn scalar_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Shapes a room snapshot into the response the polling endpoint returns.
///
/// Individual votes and the summary are only populated once the room is
/// revealed; until then pollers learn who voted, never what.
fn room_state_view(room_id: &str, room: &Room) -> RoomStateResponse {
    let users = room
        .participants
        .iter()
        .map(|(user_id, name)| {
            let vote = room.votes.get(user_id);
            ParticipantView {
                user_id: user_id.clone(),
                name: name.clone(),
                voted: vote.is_some(),
                vote: if room.revealed { vote.cloned() } else { None },
            }
        })
        .collect();

    let votes_summary = room.revealed.then(|| summarize_votes(&room.votes));

    RoomStateResponse {
        room_id: room_id.to_string(),
        deck: room.deck,
        cards: room.deck.cards().iter().map(|c| c.to_string()).collect(),
        story: room.story.clone(),
        revealed: room.revealed,
        users,
        votes_summary,
    }
}

/// Count per distinct vote value; the BTreeMap keeps keys in lexicographic
/// order, which is the order clients display ("10" sorts before "2").
fn summarize_votes(votes: &BTreeMap<String, String>) -> BTreeMap<String, u32> {
    let mut counts = BTreeMap::new();
    for value in votes.values() {
        *counts.entry(value.clone()).or_insert(0) += 1;
    }
    counts
}
