//! Error types for the room layer.

/// Errors that can occur during room operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room is full or the game already started. The room has sent
    /// the FULL banner and closed the connection.
    #[error("room \"{0}\" is not accepting players")]
    Rejected(String),

    /// The room (or registry) actor is gone — its channel closed.
    #[error("room \"{0}\" is unavailable")]
    Unavailable(String),

    /// The joining socket died during the nickname handshake.
    #[error("handshake failed: {0}")]
    Handshake(#[from] exfil_session::SessionError),
}
