//! Unified error type for the guesswho server.

use guesswho_game::GameError;
use guesswho_protocol::ProtocolError;
use guesswho_transport::TransportError;

/// Top-level error that wraps all layer-specific errors.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts layer errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum GuessWhoError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A game-level error (lobby gone, bad catalog).
    #[error(transparent)]
    Game(#[from] GameError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::ConnectionClosed("gone".into());
        let top: GuessWhoError = err.into();
        assert!(matches!(top, GuessWhoError::Transport(_)));
        assert!(top.to_string().contains("gone"));
    }

    #[test]
    fn test_from_game_error() {
        let err = GameError::LobbyUnavailable;
        let top: GuessWhoError = err.into();
        assert!(matches!(top, GuessWhoError::Game(_)));
    }

    #[test]
    fn test_from_catalog_error_via_game_error() {
        let err: GameError = guesswho_game::CatalogError::Empty.into();
        let top: GuessWhoError = err.into();
        assert!(top.to_string().contains("at least one character"));
    }
}
