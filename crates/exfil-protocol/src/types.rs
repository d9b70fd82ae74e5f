//! Game value types: the records that flow through the server's queues.

/// The reserved name of the exfiltration sink. Never a real connection,
/// never a valid nickname.
pub const GLENDA: &str = "Glenda";

/// A virtual file: a name, a transfer cost, and a secrecy value.
///
/// Files are created once by the dataset at game start and then *moved*
/// between inventories — a file lives in exactly one inventory (or the
/// Glenda pile) at any time. Identity is the name, which is unique within
/// a player's inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    /// Identity within an inventory.
    pub name: String,
    /// Bandwidth cost when sent to Glenda, in KB.
    pub size: i64,
    /// Contribution to the team score when delivered to Glenda.
    pub secrecy: i64,
}

impl File {
    pub fn new(name: impl Into<String>, size: i64, secrecy: i64) -> Self {
        Self {
            name: name.into(),
            size,
            secrecy,
        }
    }
}

/// A chat message routed through a room.
///
/// `from = ""` marks a server-originated broadcast (banner text, delivered
/// verbatim). `to = ""` or `to = "*"` addresses every player; `to = "Glenda"`
/// addresses the sink; anything else is a player name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub from: String,
    pub to: String,
    pub text: String,
}

impl Message {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            text: text.into(),
        }
    }

    /// True if this message addresses every player in the room.
    ///
    /// Only the empty string and `"*"` broadcast. `"all"` is a player name
    /// like any other.
    pub fn is_broadcast(&self) -> bool {
        self.to.is_empty() || self.to == "*"
    }

    /// True if this message addresses the exfiltration sink.
    pub fn is_for_glenda(&self) -> bool {
        self.to == GLENDA
    }

    /// True if this message originated from the server rather than a player.
    pub fn is_server(&self) -> bool {
        self.from.is_empty()
    }
}
