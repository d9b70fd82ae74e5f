//! Room actor: an isolated Tokio task that owns one game.
//!
//! Each room runs in its own task and owns ALL of its mutable state —
//! the player roster, every inventory, every bandwidth budget, the Glenda
//! pile, and the score. The outside world reaches it only through its
//! command channel. The original's four-way select (add / remove / message
//! / file) is one mpsc of [`RoomCommand`] variants plus a timer branch:
//! exactly one event per loop iteration, which also keeps a single
//! sender's chat and file events in their send order.

use std::net::SocketAddr;

use exfil_protocol::{Command, File, GLENDA, Message, banner};
use exfil_session::{Player, SessionHandle, spawn_writer};
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;

use crate::dataset::{BANDWIDTH_CAPS, Dataset};
use crate::handshake::negotiate_nickname;
use crate::reader::spawn_reader;
use crate::registry::RegistryHandle;
use crate::{RoomConfig, RoomError, RoomStatus};

/// Command channel depth per room.
const CHANNEL_SIZE: usize = 64;

/// A connection that has picked this room but not yet a nickname.
///
/// Carries both socket halves: the room runs the nickname handshake on
/// them directly, then hands them to the session's reader and writer
/// tasks.
pub struct PendingSession {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    addr: SocketAddr,
}

impl PendingSession {
    pub fn new(stream: TcpStream, addr: SocketAddr) -> Self {
        let (read_half, write_half) = stream.into_split();
        Self::from_parts(BufReader::new(read_half), write_half, addr)
    }

    /// Assembles a pending session from already-split halves. The buffered
    /// reader carries over whatever the acceptor's prompt loop had read
    /// ahead, so pipelined input is not lost.
    pub fn from_parts(
        reader: BufReader<OwnedReadHalf>,
        writer: OwnedWriteHalf,
        addr: SocketAddr,
    ) -> Self {
        Self {
            reader,
            writer,
            addr,
        }
    }
}

/// Commands sent to a room actor through its channel.
pub(crate) enum RoomCommand {
    /// A connection asking to be admitted. The reply resolves once the
    /// nickname handshake finishes (or the room has rejected and closed
    /// the socket).
    Join {
        pending: PendingSession,
        reply: oneshot::Sender<Result<String, RoomError>>,
    },

    /// A session's socket died.
    Leave { player: String },

    /// A `/msg` in flight.
    Chat(Message),

    /// A `/send` in flight.
    SendFile {
        from: String,
        to: String,
        filename: String,
    },

    /// `/help`, `/look`, or `/list` — answered from room state on the
    /// player's own queue.
    Query { player: String, cmd: Command },

    /// Metadata snapshot.
    Info { reply: oneshot::Sender<RoomInfo> },
}

/// A snapshot of room metadata.
#[derive(Debug, Clone)]
pub struct RoomInfo {
    pub name: String,
    pub status: RoomStatus,
    pub players: usize,
    /// Files in the Glenda pile.
    pub delivered: usize,
    pub score: i64,
}

/// Handle to a running room actor. Cheap to clone.
#[derive(Clone)]
pub struct RoomHandle {
    name: String,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Asks the room to admit a connection. Resolves to the accepted
    /// nickname, or an error once the room has dealt with the socket.
    pub async fn join(
        &self,
        pending: PendingSession,
    ) -> Result<String, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Join {
                pending,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.name.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.name.clone()))?
    }

    pub async fn leave(&self, player: &str) -> Result<(), RoomError> {
        self.send(RoomCommand::Leave {
            player: player.to_string(),
        })
        .await
    }

    pub async fn chat(&self, msg: Message) -> Result<(), RoomError> {
        self.send(RoomCommand::Chat(msg)).await
    }

    pub async fn send_file(
        &self,
        from: &str,
        to: String,
        filename: String,
    ) -> Result<(), RoomError> {
        self.send(RoomCommand::SendFile {
            from: from.to_string(),
            to,
            filename,
        })
        .await
    }

    pub async fn query(
        &self,
        player: &str,
        cmd: Command,
    ) -> Result<(), RoomError> {
        self.send(RoomCommand::Query {
            player: player.to_string(),
            cmd,
        })
        .await
    }

    pub async fn info(&self) -> Result<RoomInfo, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(RoomCommand::Info { reply: reply_tx }).await?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.name.clone()))
    }

    async fn send(&self, cmd: RoomCommand) -> Result<(), RoomError> {
        self.sender
            .send(cmd)
            .await
            .map_err(|_| RoomError::Unavailable(self.name.clone()))
    }
}

/// One admitted player: game record plus the live connection.
struct PlayerSlot {
    player: Player,
    session: SessionHandle,
}

/// The internal room actor state. Runs inside a Tokio task.
struct RoomActor {
    name: String,
    config: RoomConfig,
    status: RoomStatus,
    /// Roster in admit order — order decides the bandwidth assignment
    /// and the deal.
    players: Vec<PlayerSlot>,
    glenda_pile: Vec<File>,
    score: i64,
    /// Armed when the game starts; firing fails the game.
    deadline: Option<Instant>,
    receiver: mpsc::Receiver<RoomCommand>,
    /// The actor's own handle, cloned into each session's reader task.
    handle: RoomHandle,
    registry: RegistryHandle,
}

impl RoomActor {
    async fn run(mut self) {
        tracing::info!(room = %self.name, "room opened");

        loop {
            if self.status.is_terminal() {
                break;
            }
            match self.deadline {
                Some(deadline) => {
                    tokio::select! {
                        cmd = self.receiver.recv() => match cmd {
                            Some(cmd) => self.dispatch(cmd).await,
                            None => break,
                        },
                        _ = tokio::time::sleep_until(deadline) => {
                            tracing::info!(room = %self.name, "game timed out");
                            self.enter_terminal(RoomStatus::Failed);
                        }
                    }
                }
                None => match self.receiver.recv().await {
                    Some(cmd) => self.dispatch(cmd).await,
                    None => break,
                },
            }
        }

        self.finish().await;
    }

    async fn dispatch(&mut self, cmd: RoomCommand) {
        match cmd {
            RoomCommand::Join { pending, reply } => {
                let result = self.admit(pending).await;
                let _ = reply.send(result);
            }
            RoomCommand::Leave { player } => self.remove(&player),
            RoomCommand::Chat(msg) => self.route_chat(msg),
            RoomCommand::SendFile { from, to, filename } => {
                self.route_file(&from, &to, &filename)
            }
            RoomCommand::Query { player, cmd } => self.answer_query(&player, cmd),
            RoomCommand::Info { reply } => {
                let _ = reply.send(self.snapshot());
            }
        }
    }

    /// Admits a pending connection, or sends FULL and closes it.
    ///
    /// The transition to Running happens here, while a join is being
    /// processed — a concurrent admit cannot slip in between the third
    /// player and the start.
    async fn admit(
        &mut self,
        mut pending: PendingSession,
    ) -> Result<String, RoomError> {
        if !self.status.is_lobby() || self.players.len() >= self.config.capacity
        {
            let _ = pending.writer.write_all(banner::FULL.as_bytes()).await;
            let _ = pending.writer.shutdown().await;
            tracing::info!(room = %self.name, peer = %pending.addr, "turned away");
            return Err(RoomError::Rejected(self.name.clone()));
        }

        let name = negotiate_nickname(
            &mut pending.reader,
            &mut pending.writer,
            |candidate| self.players.iter().any(|s| s.player.name() == candidate),
        )
        .await?;

        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        spawn_writer(pending.writer, outbound_rx);
        let mut session = SessionHandle::new(&name, outbound_tx.clone());
        session.attach_reader(spawn_reader(
            pending.reader,
            name.clone(),
            self.handle.clone(),
            outbound_tx,
        ));

        self.players.push(PlayerSlot {
            player: Player::new(&name),
            session,
        });
        tracing::info!(
            room = %self.name,
            player = %name,
            players = self.players.len(),
            "player joined"
        );
        self.broadcast(banner::joined(&name, &self.name));

        if self.players.len() == self.config.capacity {
            self.start();
        }
        Ok(name)
    }

    /// Deals the dataset, assigns bandwidth by admit order, and starts
    /// the clock.
    fn start(&mut self) {
        let dataset = if self.config.shuffle_deal {
            Dataset::generate(&mut rand::rng())
        } else {
            Dataset::in_listed_order()
        };
        let hands = dataset.deal(self.players.len());

        for ((slot, hand), &cap) in
            self.players.iter_mut().zip(hands).zip(BANDWIDTH_CAPS.iter())
        {
            slot.player.set_bandwidth(cap);
            for file in hand {
                slot.player.give_file(file);
            }
        }

        self.status = RoomStatus::Running;
        self.deadline = Some(Instant::now() + self.config.game_timeout);
        self.broadcast(banner::START);
        tracing::info!(room = %self.name, "mission started");
    }

    fn remove(&mut self, name: &str) {
        let Some(idx) =
            self.players.iter().position(|s| s.player.name() == name)
        else {
            return;
        };
        match self.status {
            RoomStatus::Lobby => {
                // Deregistration: the name frees up, the room stays open.
                let mut slot = self.players.remove(idx);
                slot.session.end();
                tracing::info!(room = %self.name, player = %name, "left the lobby");
            }
            RoomStatus::Running => {
                tracing::info!(room = %self.name, player = %name, "left mid-game");
                self.enter_terminal(RoomStatus::ExitByLeave);
            }
            _ => {}
        }
    }

    fn route_chat(&mut self, msg: Message) {
        if !self.status.is_running() {
            return;
        }

        if msg.is_broadcast() {
            self.broadcast(banner::chat(&msg.from, &msg.text));
            return;
        }

        if msg.is_for_glenda() {
            if msg.text.trim() == "done" {
                if let Some(slot) = self.find_mut(&msg.from) {
                    slot.player.mark_done();
                }
                if self.players.iter().all(|s| s.player.is_done()) {
                    self.enter_terminal(RoomStatus::Completed);
                }
            } else if let Some(slot) = self.find(&msg.from) {
                slot.session.send_line(banner::GLENDA_BRIEFING);
            }
            return;
        }

        if let Some(recipient) = self.find(&msg.to) {
            recipient
                .session
                .send_line(banner::chat(&msg.from, &msg.text));
        } else if let Some(sender) = self.find(&msg.from) {
            sender.session.send_line(banner::unknown_client(&msg.to));
        }
    }

    /// Routes a `/send`: remove-before-deliver, with a compensating
    /// re-insert when the recipient turns out not to exist.
    fn route_file(&mut self, from: &str, to: &str, filename: &str) {
        if !self.status.is_running() {
            return;
        }
        let Some(sender_idx) =
            self.players.iter().position(|s| s.player.name() == from)
        else {
            return;
        };

        let Some(file) = self.players[sender_idx].player.take_file(filename)
        else {
            self.players[sender_idx]
                .session
                .send_line(banner::unknown_file(filename));
            return;
        };

        if to == GLENDA {
            let remaining = self.players[sender_idx].player.charge(file.size);
            if remaining < 0 {
                tracing::info!(
                    room = %self.name,
                    player = %from,
                    file = %file.name,
                    "transfer quota exceeded"
                );
                self.enter_terminal(RoomStatus::Failed);
                return;
            }
            self.score += file.secrecy;
            self.players[sender_idx]
                .session
                .send_line(banner::sent_to_glenda(&file.name));
            self.glenda_pile.push(file);
            return;
        }

        if let Some(recipient_idx) =
            self.players.iter().position(|s| s.player.name() == to)
        {
            self.players[sender_idx]
                .session
                .send_line(banner::sent_to_player(&file.name, to));
            self.players[recipient_idx].session.deliver(file.clone());
            self.players[recipient_idx].player.give_file(file);
        } else {
            self.players[sender_idx]
                .session
                .send_line(banner::unknown_file_recipient(to));
            self.players[sender_idx].player.give_file(file);
        }
    }

    fn answer_query(&self, player: &str, cmd: Command) {
        if !self.status.is_running() {
            return;
        }
        let Some(slot) = self.find(player) else {
            return;
        };
        match cmd {
            Command::Help => slot.session.send_line(banner::HELP),
            Command::Look => {
                let lines = banner::look_lines(
                    self.players.iter().map(|s| s.player.name()),
                );
                for line in lines {
                    slot.session.send_line(line);
                }
            }
            Command::List => {
                let lines = banner::file_table(
                    slot.player.bandwidth(),
                    slot.player.inventory(),
                );
                for line in lines {
                    slot.session.send_line(line);
                }
            }
            _ => {}
        }
    }

    /// Advances to a terminal status. The first trigger wins; later ones
    /// are ignored, so nothing is processed after a failure.
    fn enter_terminal(&mut self, status: RoomStatus) {
        if self.status.can_transition_to(status) {
            self.status = status;
        }
    }

    /// Terminal cleanup: closing banner, drain window, session teardown,
    /// registry notification.
    async fn finish(mut self) {
        if let Some(text) = self.closing_banner() {
            self.broadcast(text);
        }
        tokio::time::sleep(self.config.drain_grace).await;

        for slot in &mut self.players {
            slot.session.end();
        }
        self.players.clear();

        let _ = self.registry.room_ended(&self.name).await;
        tracing::info!(room = %self.name, status = %self.status, "room closed");
    }

    fn closing_banner(&self) -> Option<String> {
        match self.status {
            RoomStatus::Completed => Some(banner::completed(self.score)),
            RoomStatus::Failed => Some(banner::FAIL.to_string()),
            RoomStatus::ExitByLeave => Some(banner::LEAVE.to_string()),
            _ => None,
        }
    }

    fn broadcast(&self, text: impl Into<String>) {
        let text = text.into();
        for slot in &self.players {
            slot.session.send_line(text.clone());
        }
    }

    fn find(&self, name: &str) -> Option<&PlayerSlot> {
        self.players.iter().find(|s| s.player.name() == name)
    }

    fn find_mut(&mut self, name: &str) -> Option<&mut PlayerSlot> {
        self.players.iter_mut().find(|s| s.player.name() == name)
    }

    fn snapshot(&self) -> RoomInfo {
        RoomInfo {
            name: self.name.clone(),
            status: self.status,
            players: self.players.len(),
            delivered: self.glenda_pile.len(),
            score: self.score,
        }
    }
}

/// Spawns a new room actor task and returns a handle to it.
pub(crate) fn spawn_room(
    name: String,
    config: RoomConfig,
    registry: RegistryHandle,
) -> RoomHandle {
    let (tx, rx) = mpsc::channel(CHANNEL_SIZE);
    let handle = RoomHandle {
        name: name.clone(),
        sender: tx,
    };

    let actor = RoomActor {
        name,
        config,
        status: RoomStatus::Lobby,
        players: Vec::new(),
        glenda_pile: Vec::new(),
        score: 0,
        deadline: None,
        receiver: rx,
        handle: handle.clone(),
        registry,
    };
    tokio::spawn(actor.run());
    handle
}
