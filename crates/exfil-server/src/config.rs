//! Process-wide configuration.

use exfil_room::RoomConfig;

/// The port used when `PORT` is unset or unparsable.
pub const DEFAULT_PORT: u16 = 6000;

/// Server configuration: where to listen, and how rooms behave.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address handed to the listener, e.g. `0.0.0.0:6000`.
    pub bind_addr: String,

    /// Configuration for every room the registry creates.
    pub room: RoomConfig,
}

impl ServerConfig {
    /// Reads configuration from the environment: `PORT` (default 6000).
    pub fn from_env() -> Self {
        let port = port_from(std::env::var("PORT").ok().as_deref());
        Self {
            bind_addr: format!("0.0.0.0:{port}"),
            room: RoomConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: format!("0.0.0.0:{DEFAULT_PORT}"),
            room: RoomConfig::default(),
        }
    }
}

fn port_from(var: Option<&str>) -> u16 {
    match var {
        None => DEFAULT_PORT,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(raw, "PORT is not a valid port, using default");
            DEFAULT_PORT
        }),
    }
}
