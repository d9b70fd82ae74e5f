//! The accept loop and the per-connection intro handshake.

use std::net::SocketAddr;

use exfil_protocol::{banner, is_valid_channel};
use exfil_room::{PendingSession, RegistryHandle, spawn_registry};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

use crate::{ServerConfig, ServerError};

/// A bound exfil server, ready to run.
pub struct Server {
    listener: TcpListener,
    registry: RegistryHandle,
}

impl Server {
    /// Binds the listener and spawns the registry.
    ///
    /// # Errors
    /// [`ServerError::Bind`] when the address is unavailable — the caller
    /// turns this into a non-zero exit.
    pub async fn bind(config: ServerConfig) -> Result<Self, ServerError> {
        let listener =
            TcpListener::bind(&config.bind_addr).await.map_err(|source| {
                ServerError::Bind {
                    addr: config.bind_addr.clone(),
                    source,
                }
            })?;
        tracing::info!(addr = %config.bind_addr, "accepting connections");

        Ok(Self {
            listener,
            registry: spawn_registry(config.room),
        })
    }

    /// Returns the bound address (tests bind port 0 and read it back).
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs the accept loop. Each connection gets an independent handler
    /// task; a handler failure never touches the loop.
    pub async fn run(self) -> Result<(), ServerError> {
        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    let registry = self.registry.clone();
                    tokio::spawn(async move {
                        if let Err(e) =
                            handle_connection(stream, addr, registry).await
                        {
                            tracing::debug!(
                                peer = %addr,
                                error = %e,
                                "connection ended"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}

/// Walks one fresh connection to the door of its room: intro banner,
/// collaboration-channel prompt, registry lookup, join. The room takes the
/// socket from there (or rejects it with the FULL banner and closes it).
async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    registry: RegistryHandle,
) -> Result<(), ServerError> {
    tracing::debug!(peer = %addr, "new connection");
    let (read_half, write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);
    let mut writer = write_half;

    writer.write_all(banner::INTRO.as_bytes()).await?;

    let channel = loop {
        writer.write_all(banner::CHANNEL_PROMPT.as_bytes()).await?;
        let mut line = String::new();
        if reader.read_line(&mut line).await? == 0 {
            tracing::debug!(peer = %addr, "hung up at the channel prompt");
            return Ok(());
        }
        let name = line.trim();
        if is_valid_channel(name) {
            break name.to_string();
        }
        writer.write_all(banner::INVALID_CHANNEL.as_bytes()).await?;
    };

    let room = registry.get_or_create(&channel).await?;
    match room
        .join(PendingSession::from_parts(reader, writer, addr))
        .await
    {
        Ok(nick) => {
            tracing::info!(peer = %addr, room = %channel, player = %nick, "session started");
        }
        Err(e) => {
            tracing::info!(peer = %addr, room = %channel, error = %e, "join refused");
        }
    }
    Ok(())
}
