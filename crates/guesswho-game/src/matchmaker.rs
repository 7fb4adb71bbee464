//! The matchmaker: a single-capacity waiting slot.
//!
//! At most one connection is ever waiting system-wide. The next joiner
//! consumes the slot and both are paired into a room in one step, so no
//! intermediate state is observable between "slot taken" and "room
//! exists".

use guesswho_protocol::ConnectionId;

/// A connection parked in the waiting slot, with its display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Waiting {
    pub conn: ConnectionId,
    pub name: String,
}

/// What a join request resulted in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    /// The slot was empty; the connection is now waiting.
    Waiting,
    /// The connection already occupied the slot; its name was refreshed
    /// but nothing else happened. Prevents a connection from being
    /// paired with itself.
    AlreadyWaiting,
    /// The slot was consumed. `first` had been waiting and moves first;
    /// `second` is the joiner that completed the pair.
    Paired { first: Waiting, second: Waiting },
}

/// Holds the waiting slot.
#[derive(Debug, Default)]
pub struct Matchmaker {
    waiting: Option<Waiting>,
}

impl Matchmaker {
    pub fn new() -> Self {
        Self { waiting: None }
    }

    /// Processes a join request: park, refresh, or pair.
    pub fn join(&mut self, conn: ConnectionId, name: String) -> JoinOutcome {
        match self.waiting.take() {
            None => {
                self.waiting = Some(Waiting { conn, name });
                JoinOutcome::Waiting
            }
            Some(waiting) if waiting.conn == conn => {
                self.waiting = Some(Waiting { conn, name });
                JoinOutcome::AlreadyWaiting
            }
            Some(waiting) => JoinOutcome::Paired {
                first: waiting,
                second: Waiting { conn, name },
            },
        }
    }

    /// The currently waiting connection, if any.
    pub fn waiting(&self) -> Option<&Waiting> {
        self.waiting.as_ref()
    }

    /// Clears the slot if `conn` holds it. Returns whether it did.
    /// Called on disconnect.
    pub fn clear_if(&mut self, conn: ConnectionId) -> bool {
        if self.waiting.as_ref().is_some_and(|w| w.conn == conn) {
            self.waiting = None;
            true
        } else {
            false
        }
    }
}
