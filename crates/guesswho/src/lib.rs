//! # guesswho
//!
//! A server that pairs two remote clients into a turn-based guessing
//! game over a persistent WebSocket connection.
//!
//! The layers, leaf to root: wire events (`guesswho-protocol`), the
//! WebSocket transport (`guesswho-transport`), matchmaking and room state
//! (`guesswho-game`), and this crate, which ties them together into a
//! runnable server.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use guesswho::GuessWhoServer;
//!
//! # async fn run() -> Result<(), guesswho::GuessWhoError> {
//! let server = GuessWhoServer::builder()
//!     .bind("0.0.0.0:3000")
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod server;

pub use error::GuessWhoError;
pub use server::{GuessWhoServer, GuessWhoServerBuilder};

// Re-exported so binaries and tests don't need to depend on the
// sub-crates directly.
pub use guesswho_game::{Catalog, CatalogError};

pub mod prelude {
    pub use crate::{Catalog, GuessWhoError, GuessWhoServer};
    pub use guesswho_protocol::{
        Character, ClientEvent, Codec, ConnectionId, JsonCodec, RoomId,
        ServerEvent,
    };
}
