//! The room registry: one actor owning the channel-name → room map.
//!
//! Rooms are created on first join and removed once their terminal
//! cleanup finishes. Nothing else ever touches the map — lookups, creates,
//! and deletes all go through the registry's queue.

use std::collections::HashMap;

use tokio::sync::{mpsc, oneshot};

use crate::room::spawn_room;
use crate::{RoomConfig, RoomError, RoomHandle};

/// Registry channel depth.
const CHANNEL_SIZE: usize = 64;

enum RegistryCommand {
    /// Look up a room by channel name, creating and spawning it if this
    /// is the first join.
    GetOrCreate {
        name: String,
        reply: oneshot::Sender<RoomHandle>,
    },

    /// A room finished its terminal cleanup; forget it. A later join
    /// with the same name gets a fresh room.
    RoomEnded { name: String },

    /// Number of live rooms (tests and introspection).
    Count { reply: oneshot::Sender<usize> },
}

/// Handle to the registry actor. Cheap to clone; every room keeps one for
/// its end-of-life notification.
#[derive(Clone)]
pub struct RegistryHandle {
    sender: mpsc::Sender<RegistryCommand>,
}

impl RegistryHandle {
    /// Returns the room for `name`, creating it on first use.
    pub async fn get_or_create(
        &self,
        name: &str,
    ) -> Result<RoomHandle, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RegistryCommand::GetOrCreate {
                name: name.to_string(),
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable(name.to_string()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(name.to_string()))
    }

    /// Reports a room's terminal cleanup. Called by the room actor itself.
    pub async fn room_ended(&self, name: &str) -> Result<(), RoomError> {
        self.sender
            .send(RegistryCommand::RoomEnded {
                name: name.to_string(),
            })
            .await
            .map_err(|_| RoomError::Unavailable(name.to_string()))
    }

    /// Number of rooms currently tracked.
    pub async fn room_count(&self) -> Result<usize, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RegistryCommand::Count { reply: reply_tx })
            .await
            .map_err(|_| RoomError::Unavailable("registry".to_string()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable("registry".to_string()))
    }
}

/// Spawns the registry actor. `config` is handed to every room it creates.
pub fn spawn_registry(config: RoomConfig) -> RegistryHandle {
    let (tx, rx) = mpsc::channel(CHANNEL_SIZE);
    let handle = RegistryHandle { sender: tx };
    tokio::spawn(registry_loop(rx, handle.clone(), config));
    handle
}

async fn registry_loop(
    mut receiver: mpsc::Receiver<RegistryCommand>,
    handle: RegistryHandle,
    config: RoomConfig,
) {
    let mut rooms: HashMap<String, RoomHandle> = HashMap::new();

    while let Some(cmd) = receiver.recv().await {
        match cmd {
            RegistryCommand::GetOrCreate { name, reply } => {
                let room = rooms
                    .entry(name.clone())
                    .or_insert_with(|| {
                        tracing::info!(room = %name, "creating room");
                        spawn_room(name.clone(), config.clone(), handle.clone())
                    })
                    .clone();
                let _ = reply.send(room);
            }
            RegistryCommand::RoomEnded { name } => {
                rooms.remove(&name);
                tracing::info!(room = %name, live = rooms.len(), "room deleted");
            }
            RegistryCommand::Count { reply } => {
                let _ = reply.send(rooms.len());
            }
        }
    }
}
