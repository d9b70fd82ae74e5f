//! Room configuration and lifecycle state machine.

use std::time::Duration;

// ---------------------------------------------------------------------------
// RoomConfig
// ---------------------------------------------------------------------------

/// Configuration for a room instance.
///
/// Production uses the defaults; tests shrink the timeout and disable the
/// shuffled deal to get deterministic inventories.
#[derive(Debug, Clone)]
pub struct RoomConfig {
    /// Players required to start — and the hard cap. Extras get the FULL
    /// banner.
    pub capacity: usize,

    /// Wall-clock budget for the RUNNING phase. Elapsed without all
    /// players done means the game failed.
    pub game_timeout: Duration,

    /// How long to let closing banners drain before sockets close.
    pub drain_grace: Duration,

    /// Whether the dataset filename pool is shuffled (time-seeded) or
    /// dealt in listed order.
    pub shuffle_deal: bool,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            capacity: 3,
            game_timeout: Duration::from_secs(60),
            drain_grace: Duration::from_millis(500),
            shuffle_deal: true,
        }
    }
}

// ---------------------------------------------------------------------------
// RoomStatus
// ---------------------------------------------------------------------------

/// The lifecycle state of a room.
///
/// Status only ever advances:
///
/// ```text
/// Lobby → Running → { Completed | Failed | ExitByLeave }
/// ```
///
/// - **Lobby**: admitting sessions, prompting nicknames, rejecting extras.
/// - **Running**: routing messages and files, counting done signals.
/// - **Completed**: every player told Glenda `done`.
/// - **Failed**: a bandwidth underflow or the game timeout.
/// - **ExitByLeave**: a player disconnected mid-game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomStatus {
    Lobby,
    Running,
    Completed,
    Failed,
    ExitByLeave,
}

impl RoomStatus {
    pub fn is_lobby(&self) -> bool {
        matches!(self, Self::Lobby)
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    /// Returns `true` once the room can never process another game event.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::ExitByLeave)
    }

    /// Returns `true` if advancing to `target` preserves monotonicity.
    pub fn can_transition_to(self, target: Self) -> bool {
        match self {
            Self::Lobby => target == Self::Running,
            Self::Running => target.is_terminal(),
            _ => false,
        }
    }
}

impl std::fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lobby => write!(f, "Lobby"),
            Self::Running => write!(f, "Running"),
            Self::Completed => write!(f, "Completed"),
            Self::Failed => write!(f, "Failed"),
            Self::ExitByLeave => write!(f, "ExitByLeave"),
        }
    }
}
