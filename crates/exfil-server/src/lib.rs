//! # exfil-server
//!
//! The TCP front door of the exfil game server. Accepts connections,
//! walks each one through the intro and collaboration-channel handshake,
//! and hands it to its room via the registry. Everything after that —
//! nicknames, the game itself — belongs to the room and session layers.

mod config;
mod error;
mod server;

pub use config::ServerConfig;
pub use error::ServerError;
pub use server::Server;
