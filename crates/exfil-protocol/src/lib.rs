//! Terminal protocol for exfil.
//!
//! This crate defines the "language" that clients and the server speak:
//!
//! - **Types** ([`File`], [`Message`]) — the values that flow through the
//!   server's queues.
//! - **Commands** ([`Command`]) — the slash-command grammar clients type,
//!   parsed without any I/O so it can be tested in isolation.
//! - **Banners** ([`banner`]) — the fixed text fragments and line
//!   constructors that make up every byte the server ever writes.
//!
//! # Architecture
//!
//! The protocol layer sits below everything else. It knows nothing about
//! sockets, rooms, or tasks — it only turns lines into commands and game
//! events into lines.
//!
//! ```text
//! socket line → Command (this crate) → room routing → banner line (this crate)
//! ```

pub mod banner;

mod command;
mod error;
mod types;

pub use command::{Command, is_valid_channel};
pub use error::ProtocolError;
pub use types::{File, GLENDA, Message};
