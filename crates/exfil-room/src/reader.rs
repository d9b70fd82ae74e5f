//! The per-session reader actor.
//!
//! Reads the socket line by line, parses each line as a command, and
//! posts the result onto the room's queue. Parse errors are answered
//! directly on the offender's own outbound queue — they never reach the
//! room. EOF or a read error becomes the remove event.

use exfil_protocol::{Command, Message, banner};
use exfil_session::Outbound;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::RoomHandle;

pub(crate) fn spawn_reader<R>(
    reader: R,
    player: String,
    room: RoomHandle,
    outbound: mpsc::UnboundedSender<Outbound>,
) -> JoinHandle<()>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = reader.lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let posted = match Command::parse(&line) {
                        Ok(Command::Msg { to, text }) => room
                            .chat(Message::new(player.clone(), to, text))
                            .await
                            .is_ok(),
                        Ok(Command::Send { to, filename }) => room
                            .send_file(&player, to, filename)
                            .await
                            .is_ok(),
                        Ok(cmd) => room.query(&player, cmd).await.is_ok(),
                        Err(_) => outbound
                            .send(Outbound::Line(banner::invalid_command()))
                            .is_ok(),
                    };
                    if !posted {
                        // Room or writer gone — the session is over.
                        break;
                    }
                }
                Ok(None) => {
                    tracing::debug!(player = %player, "connection closed");
                    let _ = room.leave(&player).await;
                    break;
                }
                Err(e) => {
                    tracing::debug!(player = %player, error = %e, "read failed");
                    let _ = room.leave(&player).await;
                    break;
                }
            }
        }
    })
}
