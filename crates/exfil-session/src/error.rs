//! Error types for the session layer.

/// Errors that can occur on a session's socket path.
///
/// A session error never reaches game state directly: the reader task
/// translates it into a remove event on the room's queue and the session
/// is torn down through the normal cancellation path.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The underlying socket read or write failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The peer went away mid-handshake (clean EOF before a complete
    /// exchange).
    #[error("connection closed")]
    Closed,
}
