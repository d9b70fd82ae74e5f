//! The outbound half of a session: queue, handle, and writer task.
//!
//! Each connection gets exactly one writer task, which solely owns the
//! socket's write half. Everything the room wants a client to see goes
//! through the session's outbound queue and is written in enqueue order,
//! exactly once. The reader half lives with the room (it posts room
//! commands); the writer never touches game state.

use exfil_protocol::{File, banner};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// One item on a session's outbound queue.
#[derive(Debug)]
pub enum Outbound {
    /// A line of text. The writer appends the terminating `\n` unless the
    /// text already carries one (multi-line banners do).
    Line(String),
    /// A file moving into this player's inventory. The writer acknowledges
    /// it with a `Received file` line.
    Delivery(File),
}

/// The room's non-owning handle to a live session.
///
/// Holds the outbound queue sender and the reader task. Dropping the
/// handle (or calling [`end`](Self::end)) tears the session down: the
/// writer drains what is already queued and closes the socket, and the
/// reader task is aborted. Teardown is idempotent.
#[derive(Debug)]
pub struct SessionHandle {
    name: String,
    outbound: mpsc::UnboundedSender<Outbound>,
    reader: Option<JoinHandle<()>>,
}

impl SessionHandle {
    pub fn new(
        name: impl Into<String>,
        outbound: mpsc::UnboundedSender<Outbound>,
    ) -> Self {
        Self {
            name: name.into(),
            outbound,
            reader: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attaches the session's reader task so teardown can cancel it.
    pub fn attach_reader(&mut self, reader: JoinHandle<()>) {
        self.reader = Some(reader);
    }

    /// Queues a line for delivery. Best-effort: a dead writer means the
    /// socket is already gone and the reader path is reporting the death.
    pub fn send_line(&self, line: impl Into<String>) {
        let _ = self.outbound.send(Outbound::Line(line.into()));
    }

    /// Queues a file delivery.
    pub fn deliver(&self, file: File) {
        let _ = self.outbound.send(Outbound::Delivery(file));
    }

    /// Cancels the reader task. Idempotent; dropping the handle afterwards
    /// closes the outbound queue, which lets the writer drain and exit.
    pub fn end(&mut self) {
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        self.end();
    }
}

/// Spawns the writer task for one session.
///
/// Drains the outbound queue strictly in order. Stops on the first write
/// error (broken pipe means the reader task is about to observe the same
/// death and enqueue the remove event). When the queue closes — the room
/// dropped the handle — any items already queued are still written, then
/// the write half is shut down.
pub fn spawn_writer<W>(
    mut writer: W,
    mut rx: mpsc::UnboundedReceiver<Outbound>,
) -> JoinHandle<()>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        while let Some(item) = rx.recv().await {
            let text = match item {
                Outbound::Line(mut line) => {
                    if !line.ends_with('\n') {
                        line.push('\n');
                    }
                    line
                }
                Outbound::Delivery(file) => {
                    let mut line = banner::received_file(&file.name);
                    line.push('\n');
                    line
                }
            };
            if let Err(e) = writer.write_all(text.as_bytes()).await {
                tracing::debug!(error = %e, "session write failed");
                return;
            }
        }
        let _ = writer.shutdown().await;
    })
}
