//! `GuessWhoServer` builder and accept loop.
//!
//! This ties the layers together: transport -> protocol -> lobby. Shared
//! state lives inside the lobby actor; the accept loop only hands each
//! new connection a cloned [`LobbyHandle`].

use guesswho_game::{Catalog, InMemoryRooms, LobbyHandle, spawn_lobby};
use guesswho_protocol::JsonCodec;
use guesswho_transport::{Transport, WebSocketTransport};

use crate::GuessWhoError;
use crate::handler::handle_connection;

/// Builder for configuring and starting a guesswho server.
pub struct GuessWhoServerBuilder {
    bind_addr: String,
    catalog: Catalog,
}

impl GuessWhoServerBuilder {
    /// Creates a new builder with default settings: localhost bind and
    /// the built-in character catalog.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            catalog: Catalog::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Replaces the built-in character catalog.
    pub fn catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Binds the transport and spawns the lobby.
    pub async fn build(self) -> Result<GuessWhoServer, GuessWhoError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;
        let lobby = spawn_lobby(self.catalog, InMemoryRooms::new());
        Ok(GuessWhoServer { transport, lobby, codec: JsonCodec })
    }
}

impl Default for GuessWhoServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running guesswho server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct GuessWhoServer {
    transport: WebSocketTransport,
    lobby: LobbyHandle,
    codec: JsonCodec,
}

impl GuessWhoServer {
    /// Creates a new builder.
    pub fn builder() -> GuessWhoServerBuilder {
        GuessWhoServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the accept loop, spawning a handler task per connection.
    /// Runs until the process is terminated.
    pub async fn run(mut self) -> Result<(), GuessWhoError> {
        tracing::info!("guesswho server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let lobby = self.lobby.clone();
                    let codec = self.codec;
                    tokio::spawn(async move {
                        if let Err(e) =
                            handle_connection(conn, lobby, codec).await
                        {
                            tracing::debug!(
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
