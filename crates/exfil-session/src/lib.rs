//! Per-connection session machinery for exfil.
//!
//! This crate owns the socket-facing half of a player:
//!
//! 1. **Player record** ([`Player`]) — the inventory, bandwidth budget, and
//!    done latch the room mutates on the player's behalf.
//! 2. **Outbound path** ([`SessionHandle`], [`spawn_writer`]) — a queue and
//!    a writer task that solely owns the socket's write half, so text and
//!    file deliveries reach the client exactly once, in order.
//!
//! # How it fits in the stack
//!
//! ```text
//! Room layer (above)   ← owns Player records, holds SessionHandles
//!     ↕
//! Session layer (this crate)   ← outbound queue, writer task, teardown
//!     ↕
//! Protocol layer (below)   ← the lines and files being delivered
//! ```

mod connection;
mod error;
mod player;

pub use connection::{Outbound, SessionHandle, spawn_writer};
pub use error::SessionError;
pub use player::Player;
