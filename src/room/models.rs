use std::collections::BTreeMap;

use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Alphabet for room and participant ids (36 symbols)
const ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Room codes are short enough to read out loud
pub const ROOM_ID_LEN: usize = 5;

/// Participant ids double as the voting credential, so they get more entropy
pub const PARTICIPANT_ID_LEN: usize = 8;

/// Generates a random uppercase-alphanumeric id of the given length.
///
/// `rand::rng()` is a CSPRNG, so participant ids are unguessable.
pub fn random_id(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| *ID_ALPHABET.choose(&mut rng).unwrap() as char)
        .collect()
}

/// Named card decks offered to clients.
///
/// Decks are advisory: the server returns their card labels for rendering but
/// never validates a cast vote against them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Deck {
    Fibonacci,
    Powers2,
    Tshirt,
}

impl Deck {
    /// Ordered card labels for this deck.
    pub fn cards(&self) -> &'static [&'static str] {
        match self {
            Deck::Fibonacci => &[
                "0", "1", "2", "3", "5", "8", "13", "20", "40", "100", "?", "☕",
            ],
            Deck::Powers2 => &["0", "1", "2", "4", "8", "16", "32", "64", "?", "☕"],
            Deck::Tshirt => &["XS", "S", "M", "L", "XL", "?", "☕"],
        }
    }
}

/// One estimation session: membership, votes, and round state.
///
/// BTreeMaps keep listing order stable across polls; the random ids make the
/// order arbitrary but deterministic.
#[derive(Debug, Clone)]
pub struct Room {
    pub deck: Deck,
    pub story: String,
    pub revealed: bool,
    /// participant id -> display name
    pub participants: BTreeMap<String, String>,
    /// participant id -> vote value; only ever keyed by current participants
    pub votes: BTreeMap<String, String>,
}

impl Room {
    /// Creates a room in its initial state: default deck, no story, hidden,
    /// nobody joined.
    pub fn new() -> Self {
        Self {
            deck: Deck::Fibonacci,
            story: String::new(),
            revealed: false,
            participants: BTreeMap::new(),
            votes: BTreeMap::new(),
        }
    }

    /// Check whether a participant id is a current member
    pub fn has_participant(&self, participant_id: &str) -> bool {
        self.participants.contains_key(participant_id)
    }

    /// Adds a participant under a fresh id and returns that id.
    ///
    /// Also drops any stale vote under the id; ids are always freshly
    /// generated so in practice there is nothing to drop.
    pub fn add_participant(&mut self, name: String) -> String {
        let participant_id = random_id(PARTICIPANT_ID_LEN);
        self.participants.insert(participant_id.clone(), name);
        self.votes.remove(&participant_id);
        participant_id
    }

    /// Starts a fresh round: votes cleared, results hidden, membership kept.
    pub fn reset_round(&mut self) {
        self.revealed = false;
        self.votes.clear();
    }
}

impl Default for Room {
    fn default() -> Self {
        Self::new()
    }
}
