//! Per-connection handler: registration, event routing, and the
//! outbound pump.
//!
//! Each accepted connection gets its own Tokio task running this
//! handler. The flow is:
//!   1. Register an outbound channel with the lobby
//!   2. Spawn a writer task pumping lobby events out to the socket
//!   3. Loop: receive frames -> decode client events -> lobby commands
//!   4. On exit (clean close, error, or panic) the drop guard tells the
//!      lobby the connection is gone

use guesswho_game::LobbyHandle;
use guesswho_protocol::{ClientEvent, Codec, ConnectionId};
use guesswho_transport::{Connection, WebSocketConnection};
use tokio::sync::mpsc;

use crate::GuessWhoError;

/// Drop guard that removes the connection from the lobby when the
/// handler exits, whatever the exit path. `Drop` is synchronous, so the
/// async disconnect runs in a fire-and-forget task.
struct DisconnectGuard {
    conn_id: ConnectionId,
    lobby: LobbyHandle,
}

impl Drop for DisconnectGuard {
    fn drop(&mut self) {
        let conn_id = self.conn_id;
        let lobby = self.lobby.clone();
        tokio::spawn(async move {
            let _ = lobby.disconnect(conn_id).await;
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C: Codec + Clone>(
    conn: WebSocketConnection,
    lobby: LobbyHandle,
    codec: C,
) -> Result<(), GuessWhoError> {
    let conn_id = conn.id();
    tracing::debug!(%conn_id, "handling new connection");

    let (tx, mut rx) = mpsc::unbounded_channel();
    lobby.connect(conn_id, tx).await?;
    let _guard = DisconnectGuard { conn_id, lobby: lobby.clone() };

    // Writer: pumps lobby events out to the socket. Ends on its own once
    // the lobby drops this connection's sender.
    let writer_conn = conn.clone();
    let writer_codec = codec.clone();
    let writer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let bytes = match writer_codec.encode(&event) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to encode event");
                    continue;
                }
            };
            if writer_conn.send(&bytes).await.is_err() {
                break;
            }
        }
    });

    // Reader: decode client events and forward them to the lobby.
    loop {
        let data = match conn.recv().await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::info!(%conn_id, "connection closed cleanly");
                break;
            }
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "recv error");
                break;
            }
        };

        let event: ClientEvent = match codec.decode(&data) {
            Ok(event) => event,
            Err(e) => {
                tracing::debug!(
                    %conn_id, error = %e,
                    "failed to decode client event"
                );
                continue;
            }
        };

        match event {
            ClientEvent::JoinGame { name } => {
                lobby.join_game(conn_id, name).await?;
            }
            ClientEvent::Guess { guessed_name, room_id } => {
                lobby.guess(conn_id, room_id, guessed_name).await?;
            }
            ClientEvent::NewRound { room_id } => {
                lobby.new_round(conn_id, room_id).await?;
            }
        }
    }

    writer.abort();
    // _guard drops here -> the lobby removes the connection.
    Ok(())
}
