//! Every byte the server writes: fixed banners and line constructors.
//!
//! The multi-line banners are a compatibility surface — clients and tests
//! match on them verbatim, so they carry their own trailing newlines and
//! must not be reflowed. The single-line constructors return unterminated
//! lines; the session writer appends the `\n`.

use crate::File;

pub const INTRO: &str = "A monolithic building appears before you. You have arrived at the office. Try
not to act suspicious.
";

pub const CHANNEL_PROMPT: &str =
    "Log in to your team's assigned collaboration channel:\n";

pub const INVALID_CHANNEL: &str = "Invalid channel\n";

pub const NICK_PROMPT: &str = "Enter a nickname:\n";

pub const INVALID_NICKNAME: &str = "Invalid Username\n";

pub const NAME_TAKEN: &str = "Error name taken.\n";

pub const FULL: &str =
    "It seems your teammates have started without you. Exiting...\n";

pub const START: &str = "* -- | Everyone has arrived, mission starting...
* -- | Ask for /help to get familiar around here
";

pub const HELP: &str = "help -- |  Usage:
help -- |
help -- |     /[cmd] [arguments]
help -- |
help -- |  Available commands:
help -- |
help -- |    /msg [to] [text]         send message to coworker
help -- |    /list                    look at files you have access to
help -- |    /send [to] [filename]    move file to coworker
help -- |    /look                    show coworkers
";

pub const GLENDA_BRIEFING: &str = "Glenda | Psst, hey there. I'm going to need your help if we want to exfiltrate
Glenda | these documents. You have clearance that I don't.
Glenda |
Glenda | You each have access to a different set of sensitive files. Within your
Glenda | group you can freely send files to each other for further analysis.
Glenda | However, when sending files to me, the corporate infrastructure team
Glenda | will be alerted if you exceed your transfer quota. Working on too many
Glenda | files will make them suspicious.
Glenda |
Glenda | Please optimize your transfers by the political impact it will create
Glenda | without exceeding any individual transfer quota. The file's security
Glenda | clearance is a good metric to go by for that. Thanks!
Glenda |
Glenda | When each of you is finished sending me files, send me the message
Glenda | 'done'. I'll wait to hear this from all of you before we execute phase
Glenda | two.
";

pub const FAIL: &str = "fail | You wake up bleary eyed and alone in a concrete box. Your head has a
fail | lump on the side. It seems corporate security noticed you didn't belong,
fail | you should have acted faster. You wonder if you will ever see your
fail | burrow again
";

pub const LEAVE: &str =
    "One of your teammates chickened out. Ending game...\n";

/// Closing line for a completed game.
pub fn completed(score: i64) -> String {
    format!("Game ended. Score {score}")
}

/// Broadcast announcing a freshly admitted player.
pub fn joined(nick: &str, channel: &str) -> String {
    format!("--> | {nick} has joined {channel}, waiting for teammates...")
}

/// A chat line as delivered to its recipients.
pub fn chat(from: &str, text: &str) -> String {
    format!("{from} | {text}")
}

pub fn invalid_command() -> String {
    "err -- | Invalid command, try /help to see valid commands".to_string()
}

pub fn unknown_client(to: &str) -> String {
    format!("err -- | Client \"{to}\" does not exist")
}

pub fn unknown_file(name: &str) -> String {
    format!("err -- | Error sending file: file \"{name}\" does not exist")
}

pub fn unknown_file_recipient(to: &str) -> String {
    format!("err -- | Error sending file: client \"{to}\" does not exist")
}

pub fn sent_to_glenda(name: &str) -> String {
    format!("send -- | Sent file: {name}")
}

pub fn sent_to_player(name: &str, to: &str) -> String {
    format!("send -- | Sent file: {name} to {to}")
}

pub fn received_file(name: &str) -> String {
    format!("send -- | Received file: {name}")
}

/// The `/look` reply: every coworker in the room, then Glenda.
pub fn look_lines<'a>(players: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut lines: Vec<String> =
        players.map(|name| format!("look -- | {name}")).collect();
    lines.push(format!("look -- | {}", crate::GLENDA));
    lines
}

/// The `/list` reply: remaining bandwidth, then the owned files as an
/// aligned table (each column padded to its widest cell plus two spaces,
/// matching the original renderer).
pub fn file_table(bandwidth: i64, files: &[File]) -> Vec<String> {
    let mut lines =
        vec![format!("list -- | Remaining Bandwidth: {bandwidth} KB")];

    let name_w = files
        .iter()
        .map(|f| f.name.len())
        .chain(std::iter::once("Name".len()))
        .max()
        .unwrap_or(0);
    let size_w = files
        .iter()
        .map(|f| f.size.to_string().len())
        .chain(std::iter::once("Size".len()))
        .max()
        .unwrap_or(0);

    lines.push(format!(
        "list -- |  {:<name_w$}  {:<size_w$}  {}",
        "Name", "Size", "Secrecy Value"
    ));
    for f in files {
        lines.push(format!(
            "list -- |  {:<name_w$}  {:<size_w$}  {}",
            f.name,
            f.size.to_string(),
            f.secrecy
        ));
    }
    lines
}
