//! The nickname handshake.
//!
//! Runs inside the room while it processes a join — uniqueness is
//! room-scoped, so only the room can referee it. Generic over the stream
//! halves so it can be exercised with in-memory duplex pipes.

use exfil_protocol::{GLENDA, banner};
use exfil_session::SessionError;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// Prompts until the peer offers an acceptable nickname: non-empty, not
/// the reserved sink name, and not already taken in this room.
///
/// Bounded by socket liveness only — a silent peer keeps the prompt
/// pending until the connection dies.
pub(crate) async fn negotiate_nickname<R, W>(
    reader: &mut R,
    writer: &mut W,
    is_taken: impl Fn(&str) -> bool,
) -> Result<String, SessionError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    loop {
        writer.write_all(banner::NICK_PROMPT.as_bytes()).await?;

        let mut line = String::new();
        if reader.read_line(&mut line).await? == 0 {
            return Err(SessionError::Closed);
        }
        let name = line.trim();

        if name.is_empty() || name == GLENDA {
            writer.write_all(banner::INVALID_NICKNAME.as_bytes()).await?;
            continue;
        }
        if is_taken(name) {
            writer.write_all(banner::NAME_TAKEN.as_bytes()).await?;
            continue;
        }
        return Ok(name.to_string());
    }
}
