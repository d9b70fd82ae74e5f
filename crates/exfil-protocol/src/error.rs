//! Error types for the protocol layer.

/// Errors that can occur while interpreting client input.
///
/// These are *user* errors: the caller reports them back on the offender's
/// own queue and carries on. Nothing here ever terminates a game.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// The line is not a well-formed, known command with the right
    /// arguments.
    #[error("invalid command")]
    InvalidCommand,
}
