//! The slash-command grammar.
//!
//! Parsing is a pure function from a line of input to a [`Command`] — no
//! I/O, no room state. The caller decides what an error means (in practice:
//! one `err -- |` line back to the offender, nothing else).

use std::sync::LazyLock;

use regex::Regex;

use crate::ProtocolError;

/// `/cmd [arg1] [rest...]` — the verb, one token, and everything after it.
static COMMAND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/(\w+)(?:\s+(\S+))?(?:\s+(.*))?$").expect("command pattern")
});

/// Collaboration-channel names: one or more word characters, nothing else.
static CHANNEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("channel pattern"));

/// Returns `true` if `name` is acceptable as a collaboration channel.
pub fn is_valid_channel(name: &str) -> bool {
    CHANNEL_RE.is_match(name)
}

/// A parsed client command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/help` — usage banner.
    Help,
    /// `/look` — list the coworkers in the room (plus Glenda).
    Look,
    /// `/list` — remaining bandwidth and owned files.
    List,
    /// `/msg <to> <text>` — chat with a coworker, broadcast, or Glenda.
    Msg { to: String, text: String },
    /// `/send <to> <filename>` — move a file to a coworker or Glenda.
    Send { to: String, filename: String },
}

impl Command {
    /// Parses one input line (trailing `\r\n` already stripped or not —
    /// both are handled).
    ///
    /// # Errors
    /// [`ProtocolError::InvalidCommand`] for anything that is not a
    /// well-formed, known command with the right arguments.
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        let line = line.trim_end_matches(['\r', '\n']);
        let caps = COMMAND_RE
            .captures(line)
            .ok_or(ProtocolError::InvalidCommand)?;

        let verb = &caps[1];
        let arg = caps.get(2).map(|m| m.as_str());
        let rest = caps.get(3).map(|m| m.as_str());

        match verb {
            "help" => Ok(Command::Help),
            "look" => Ok(Command::Look),
            "list" => Ok(Command::List),
            "msg" => match (arg, rest) {
                (Some(to), Some(text)) if !text.is_empty() => {
                    Ok(Command::Msg {
                        to: to.to_string(),
                        text: text.to_string(),
                    })
                }
                _ => Err(ProtocolError::InvalidCommand),
            },
            "send" => match (arg, rest) {
                (Some(to), Some(filename)) if !filename.is_empty() => {
                    Ok(Command::Send {
                        to: to.to_string(),
                        filename: filename.trim().to_string(),
                    })
                }
                _ => Err(ProtocolError::InvalidCommand),
            },
            _ => Err(ProtocolError::InvalidCommand),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_commands() {
        assert_eq!(Command::parse("/help").unwrap(), Command::Help);
        assert_eq!(Command::parse("/look").unwrap(), Command::Look);
        assert_eq!(Command::parse("/list").unwrap(), Command::List);
    }

    #[test]
    fn test_parse_msg() {
        assert_eq!(
            Command::parse("/msg gopher2 meet me at the printer").unwrap(),
            Command::Msg {
                to: "gopher2".into(),
                text: "meet me at the printer".into(),
            }
        );
    }

    #[test]
    fn test_parse_msg_to_glenda_done() {
        assert_eq!(
            Command::parse("/msg Glenda done").unwrap(),
            Command::Msg {
                to: "Glenda".into(),
                text: "done".into(),
            }
        );
    }

    #[test]
    fn test_parse_send() {
        assert_eq!(
            Command::parse("/send Glenda filename_0").unwrap(),
            Command::Send {
                to: "Glenda".into(),
                filename: "filename_0".into(),
            }
        );
    }

    #[test]
    fn test_parse_strips_line_endings() {
        assert_eq!(Command::parse("/help\r\n").unwrap(), Command::Help);
        assert_eq!(Command::parse("/help\n").unwrap(), Command::Help);
    }

    #[test]
    fn test_unknown_verb_is_invalid() {
        assert!(Command::parse("/quit").is_err());
        assert!(Command::parse("/HELP extra").is_err());
    }

    #[test]
    fn test_plain_chat_line_is_invalid() {
        assert!(Command::parse("hello everyone").is_err());
        assert!(Command::parse("").is_err());
        assert!(Command::parse("   ").is_err());
    }

    #[test]
    fn test_missing_arguments_are_invalid() {
        assert!(Command::parse("/msg").is_err());
        assert!(Command::parse("/msg gopher2").is_err());
        assert!(Command::parse("/send").is_err());
        assert!(Command::parse("/send Glenda").is_err());
    }

    #[test]
    fn test_slash_alone_is_invalid() {
        assert!(Command::parse("/").is_err());
        assert!(Command::parse("/ msg a b").is_err());
    }

    #[test]
    fn test_channel_names() {
        assert!(is_valid_channel("alpha"));
        assert!(is_valid_channel("team_42"));
        assert!(!is_valid_channel(""));
        assert!(!is_valid_channel("team 42"));
        assert!(!is_valid_channel("team-42"));
        assert!(!is_valid_channel("alpha\n"));
    }
}
