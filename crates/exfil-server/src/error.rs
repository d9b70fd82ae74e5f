//! Error types for the server layer.

use exfil_room::RoomError;

/// Top-level server errors.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The listener could not bind — the process exits non-zero.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    /// Socket I/O during the intro/channel handshake.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The registry or a room refused or went away.
    #[error(transparent)]
    Room(#[from] RoomError),
}
