//! Game rooms for exfil.
//!
//! Each room runs as an isolated Tokio task (actor model) that owns its
//! roster, inventories, score, and status; the registry is a second actor
//! owning the channel-name → room map. Sessions reach their room only
//! through its command queue, and the room reaches sessions only through
//! their outbound queues.

pub mod dataset;

mod config;
mod error;
mod handshake;
mod reader;
mod registry;
mod room;

pub use config::{RoomConfig, RoomStatus};
pub use error::RoomError;
pub use registry::{RegistryHandle, spawn_registry};
pub use room::{PendingSession, RoomHandle, RoomInfo};
