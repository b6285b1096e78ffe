use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::models::Deck;

/// Response for room creation
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateRoomResponse {
    pub room_id: String,
}

/// Request payload for joining a room; the body may be omitted entirely
#[derive(Debug, Default, Deserialize)]
pub struct JoinRoomRequest {
    pub name: Option<String>,
}

/// Response for a successful join; `user_id` is the voting credential
#[derive(Debug, Serialize, Deserialize)]
pub struct JoinRoomResponse {
    pub user_id: String,
    pub room_id: String,
    pub name: String,
}

/// Request payload for casting a vote.
///
/// `value` accepts any JSON scalar; it is coerced to its string form before
/// storage, so a numeric `5` and a string `"5"` are the same vote.
#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub user_id: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

/// One participant as seen by pollers.
///
/// `vote` is populated only once the room is revealed; before that it stays
/// null even when the participant has voted.
#[derive(Debug, Serialize, Deserialize)]
pub struct ParticipantView {
    pub user_id: String,
    pub name: String,
    pub voted: bool,
    pub vote: Option<String>,
}

/// Full room state returned by the polling endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct RoomStateResponse {
    pub room_id: String,
    pub deck: Deck,
    /// Card labels of the active deck, for client rendering only
    pub cards: Vec<String>,
    pub story: String,
    pub revealed: bool,
    pub users: Vec<ParticipantView>,
    /// Count per distinct vote value, keys in lexicographic order;
    /// null until the room is revealed
    pub votes_summary: Option<BTreeMap<String, u32>>,
}

/// Plain acknowledgement body
#[derive(Debug, Serialize, Deserialize)]
pub struct Ack {
    pub ok: bool,
}

impl Ack {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}

/// Request payload for switching decks
#[derive(Debug, Deserialize)]
pub struct SetDeckRequest {
    pub deck: String,
}

/// Response for a deck switch, echoing the now-active deck
#[derive(Debug, Serialize, Deserialize)]
pub struct SetDeckResponse {
    pub ok: bool,
    pub deck: Deck,
}

/// Request payload for updating the story label; the body may be omitted
#[derive(Debug, Default, Deserialize)]
pub struct SetStoryRequest {
    pub story: Option<String>,
}
