//! Matchmaking and game state for the guesswho server.
//!
//! All mutable state (the single waiting slot, the room registry, the
//! outbound routes) is owned by one lobby actor task; client events are
//! commands on its channel and are handled to completion in arrival
//! order.
//!
//! # Key types
//!
//! - [`Catalog`] - the read-only list of guessable characters
//! - [`Matchmaker`] - the single-capacity waiting slot
//! - [`Room`] - one two-player session: secrets, turn order, round phase
//! - [`RoomStore`] - the registry seam ([`InMemoryRooms`] is the default)
//! - [`LobbyHandle`] - send commands to the running lobby actor

mod catalog;
mod error;
mod lobby;
mod matchmaker;
mod registry;
mod room;

pub use catalog::Catalog;
pub use error::{CatalogError, GameError};
pub use lobby::{
    EventSender, LobbyHandle, LobbyStats, RoomSnapshot, spawn_lobby,
};
pub use matchmaker::{JoinOutcome, Matchmaker, Waiting};
pub use registry::{InMemoryRooms, RoomStore};
pub use room::{Room, RoundPhase};
