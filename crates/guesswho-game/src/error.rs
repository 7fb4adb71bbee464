//! Error types for the game layer.

/// Errors that can occur when talking to the lobby.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// The lobby actor is gone (its channel is closed). Only happens
    /// during shutdown.
    #[error("lobby is unavailable")]
    LobbyUnavailable,

    /// The character catalog override could not be used.
    #[error("invalid character catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// Errors raised while building a [`Catalog`](crate::Catalog).
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The catalog JSON did not parse as a list of characters.
    #[error("catalog JSON is malformed: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A catalog must contain at least one character to draw from.
    #[error("catalog must contain at least one character")]
    Empty,

    /// Names identify characters, so they must be unique.
    #[error("duplicate character name: {0}")]
    DuplicateName(String),
}
