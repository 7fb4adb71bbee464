//! Wire protocol for the guesswho server.
//!
//! This crate defines the "language" that clients and the server speak:
//!
//! - **Types** ([`ClientEvent`], [`ServerEvent`], [`Character`], the id
//!   newtypes) - the structures that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) - how those structures
//!   are converted to and from bytes.
//! - **Errors** ([`ProtocolError`]) - what can go wrong while encoding
//!   or decoding.
//!
//! The protocol layer sits between transport (raw bytes) and game logic
//! (rooms, turns). It knows nothing about sockets or rooms - only how
//! events are shaped and serialized.

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    Character, ClientEvent, ConnectionId, Recipient, RoomId, ServerEvent,
};
