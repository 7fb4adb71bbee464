//! Core wire types: identities, the character catalog entry, and the
//! client/server event enums.
//!
//! Every event is an internally tagged JSON object. The `"event"` tag
//! carries the event name and the remaining fields are the payload, so a
//! guess looks like:
//!
//! ```json
//! { "event": "guess", "guessedName": "Diana", "roomId": 3 }
//! ```
//!
//! Field names are camelCase on the wire; these shapes are the contract
//! with clients and are pinned by the tests below.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// An ephemeral identifier for one live client connection.
///
/// Assigned by the server when the transport session is accepted and valid
/// only for that session's lifetime; there is no persisted identity behind
/// it. Connection ids double as player ids in room payloads
/// (`currentTurn`, `winner`, `guesser`, the `names` keys).
///
/// `#[serde(transparent)]` makes a `ConnectionId(42)` serialize as plain
/// `42`, not `{"0": 42}`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// A unique identifier for a room (one two-player game session).
///
/// Generated when a pair is formed and stable for the room's lifetime.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RoomId(pub u64);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "room-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Character
// ---------------------------------------------------------------------------

/// One guessable entity on the board.
///
/// Characters are immutable and identified by `name`; the image URL is
/// display-only. Secrets are `Character` values drawn from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub image_url: String,
    pub name: String,
}

// ---------------------------------------------------------------------------
// Recipient - who should receive a server event?
// ---------------------------------------------------------------------------

/// Specifies who should receive a server event.
///
/// Game logic returns `(Recipient, ServerEvent)` pairs; the dispatch layer
/// resolves each recipient against the room's player list. This never
/// travels on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    /// Every player in the room.
    All,
    /// One specific connection.
    Player(ConnectionId),
    /// Everyone in the room except the given connection. Used for the
    /// opponent-disconnected notice.
    AllExcept(ConnectionId),
}

// ---------------------------------------------------------------------------
// Client -> server events
// ---------------------------------------------------------------------------

/// Events a client can send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientEvent {
    /// Enter matchmaking under a display name.
    JoinGame { name: String },

    /// Submit a guess for the opponent's secret.
    Guess { guessed_name: String, room_id: RoomId },

    /// Request the next round after a win.
    NewRound { room_id: RoomId },
}

// ---------------------------------------------------------------------------
// Server -> client events
// ---------------------------------------------------------------------------

/// Events the server can send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    /// Informational text: waiting for an opponent, wrong turn, wrong
    /// guess, opponent disconnected.
    Message { text: String },

    /// A game has started. Sent once per player; `characters` is that
    /// player's own shuffled view of the catalog, so board orders differ
    /// between the two players and reveal nothing about either secret.
    GameStart {
        room_id: RoomId,
        characters: Vec<Character>,
        current_turn: ConnectionId,
        names: HashMap<ConnectionId, String>,
    },

    /// Private delivery of this player's own secret. Never broadcast.
    SecretAssigned { secret: Character },

    /// Whose move it is now.
    TurnChange { current_turn: ConnectionId },

    /// Public echo of a guess to both room members.
    GuessMade {
        guesser: ConnectionId,
        guesser_name: String,
        guessed_name: String,
    },

    /// The round is over; `winner` guessed `guessed_name` correctly.
    GameOver {
        winner: ConnectionId,
        guessed_name: String,
    },

    /// Next-round payload, sent once per player. Unlike game start, the
    /// player's new secret rides inside this per-player event.
    NewRound {
        room_id: RoomId,
        characters: Vec<Character>,
        current_turn: ConnectionId,
        secret: Character,
    },
}

// =========================================================================
// Tests
// =========================================================================
