//! End-to-end tests: real clients against a full server on a random port.

use std::net::SocketAddr;
use std::time::Duration;

use exfil_room::RoomConfig;
use exfil_server::{Server, ServerConfig};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::time::timeout;

const TICK: Duration = Duration::from_secs(5);

async fn start_server(room: RoomConfig) -> SocketAddr {
    let server = Server::bind(ServerConfig {
        bind_addr: "127.0.0.1:0".to_string(),
        room,
    })
    .await
    .expect("server should bind");
    let addr = server.local_addr().expect("should have a local addr");
    tokio::spawn(async move {
        let _ = server.run().await;
    });
    addr
}

fn test_rooms() -> RoomConfig {
    RoomConfig {
        shuffle_deal: false,
        drain_grace: Duration::from_millis(50),
        ..RoomConfig::default()
    }
}

struct Client {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

impl Client {
    async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.expect("connect");
        let (read_half, write_half) = stream.into_split();
        Self {
            lines: BufReader::new(read_half).lines(),
            writer: write_half,
        }
    }

    async fn send(&mut self, line: &str) {
        self.writer
            .write_all(format!("{line}\n").as_bytes())
            .await
            .expect("client write");
    }

    async fn next_line(&mut self) -> String {
        timeout(TICK, self.lines.next_line())
            .await
            .expect("timed out waiting for a line")
            .expect("client read")
            .expect("unexpected EOF")
    }

    async fn await_line(&mut self, needle: &str) -> String {
        loop {
            let line = self.next_line().await;
            if line.contains(needle) {
                return line;
            }
        }
    }

    async fn await_eof(&mut self) {
        loop {
            match timeout(TICK, self.lines.next_line())
                .await
                .expect("timed out waiting for EOF")
            {
                Ok(Some(_)) => continue,
                Ok(None) | Err(_) => return,
            }
        }
    }
}

/// Connects and walks the intro, channel, and nickname prompts.
async fn join(addr: SocketAddr, channel: &str, nick: &str) -> Client {
    let mut client = Client::connect(addr).await;
    client.await_line("A monolithic building appears").await;
    client.await_line("collaboration channel").await;
    client.send(channel).await;
    client.await_line("Enter a nickname:").await;
    client.send(nick).await;
    client.await_line(&format!("{nick} has joined {channel}")).await;
    client
}

/// Joins three players and waits for the start broadcast on each.
async fn full_team(
    addr: SocketAddr,
    channel: &str,
) -> (Client, Client, Client) {
    let mut a1 = join(addr, channel, "a1").await;
    let mut a2 = join(addr, channel, "a2").await;
    let mut a3 = join(addr, channel, "a3").await;
    // Drain the whole two-line start banner on every client.
    for client in [&mut a1, &mut a2, &mut a3] {
        client.await_line("mission starting").await;
        client.await_line("Ask for /help").await;
    }
    (a1, a2, a3)
}

#[tokio::test]
async fn test_happy_path_scores_ninety_two() {
    let addr = start_server(test_rooms()).await;
    let (mut a1, mut a2, mut a3) = full_team(addr, "alpha").await;

    // a1 was admitted first: bandwidth 50, holding files 0, 3, 6, 9.
    a1.send("/list").await;
    a1.await_line("Remaining Bandwidth: 50 KB").await;
    a1.await_line("filename_0").await;

    a1.send("/send Glenda filename_0").await;
    a1.await_line("send -- | Sent file: filename_0").await;

    a1.send("/msg Glenda done").await;
    a2.send("/msg Glenda done").await;
    a3.send("/msg Glenda done").await;

    for client in [&mut a1, &mut a2, &mut a3] {
        assert_eq!(
            client.await_line("Game ended").await,
            "Game ended. Score 92"
        );
        client.await_eof().await;
    }
}

#[tokio::test]
async fn test_bandwidth_overflow_fails_for_everyone() {
    let addr = start_server(test_rooms()).await;
    let (mut a1, mut a2, mut a3) = full_team(addr, "alpha").await;

    // a2 hands a1 a 31 KB file for free, then a1 (50 KB budget) sends
    // 23 KB and 31 KB to Glenda: 50 − 23 − 31 = −4.
    a2.send("/send a1 filename_1").await;
    a1.await_line("Received file: filename_1").await;

    a1.send("/send Glenda filename_0").await;
    a1.await_line("Sent file: filename_0").await;
    a1.send("/send Glenda filename_1").await;

    for client in [&mut a1, &mut a2, &mut a3] {
        client.await_line("corporate security noticed").await;
        client.await_eof().await;
    }
}

#[tokio::test]
async fn test_send_at_exact_budget_succeeds_then_any_more_fails() {
    let addr = start_server(test_rooms()).await;
    let (_a1, mut a2, mut a3) = full_team(addr, "alpha").await;

    // a3 has 120 KB and files 2 (29), 5 (38), 8 (89). With a2's
    // filename_4 (53) transferred over, 29 + 38 + 53 lands on exactly 0.
    a2.send("/send a3 filename_4").await;
    a3.await_line("Received file: filename_4").await;

    a3.send("/send Glenda filename_2").await;
    a3.await_line("Sent file: filename_2").await;
    a3.send("/send Glenda filename_5").await;
    a3.await_line("Sent file: filename_5").await;
    a3.send("/send Glenda filename_4").await;
    a3.await_line("Sent file: filename_4").await;

    a3.send("/list").await;
    a3.await_line("Remaining Bandwidth: 0 KB").await;

    // One byte over the line: the remaining 89 KB file fails the game.
    a3.send("/send Glenda filename_8").await;
    a3.await_line("corporate security noticed").await;
    a3.await_eof().await;
}

#[tokio::test]
async fn test_disconnect_mid_game_ends_it_for_the_team() {
    let addr = start_server(test_rooms()).await;
    let (mut a1, a2, mut a3) = full_team(addr, "alpha").await;

    drop(a2);
    for client in [&mut a1, &mut a3] {
        client
            .await_line("One of your teammates chickened out")
            .await;
        client.await_eof().await;
    }

    // The registry forgets "alpha" as the room's last act; give that
    // notification a beat to land, then the same channel opens a fresh
    // lobby.
    tokio::time::sleep(Duration::from_millis(200)).await;
    let mut again = join(addr, "alpha", "a1").await;
    again.send("/list").await;
}

#[tokio::test]
async fn test_unknown_recipient_only_answers_the_sender() {
    let addr = start_server(test_rooms()).await;
    let (mut a1, mut a2, _a3) = full_team(addr, "alpha").await;

    a1.send("/msg bob hi").await;
    assert_eq!(
        a1.await_line("bob").await,
        "err -- | Client \"bob\" does not exist"
    );

    // a2 saw nothing in between: the next line it gets is the sentinel.
    a1.send("/msg * sentinel").await;
    assert_eq!(a2.next_line().await, "a1 | sentinel");
}

#[tokio::test]
async fn test_name_collision_reprompts_until_unique() {
    let addr = start_server(test_rooms()).await;
    let _x = join(addr, "beta", "x").await;

    let mut second = Client::connect(addr).await;
    second.await_line("collaboration channel").await;
    second.send("beta").await;
    second.await_line("Enter a nickname:").await;
    second.send("x").await;
    second.await_line("Error name taken.").await;
    second.await_line("Enter a nickname:").await;
    second.send("y").await;
    second.await_line("y has joined beta").await;
}

#[tokio::test]
async fn test_invalid_channel_reprompts() {
    let addr = start_server(test_rooms()).await;
    let mut client = Client::connect(addr).await;

    client.await_line("collaboration channel").await;
    client.send("bad channel!").await;
    client.await_line("Invalid channel").await;
    client.await_line("collaboration channel").await;
    client.send("team_42").await;
    client.await_line("Enter a nickname:").await;
}

#[tokio::test]
async fn test_fourth_join_gets_the_full_banner() {
    let addr = start_server(test_rooms()).await;
    let (_a1, _a2, _a3) = full_team(addr, "alpha").await;

    let mut late = Client::connect(addr).await;
    late.await_line("collaboration channel").await;
    late.send("alpha").await;
    late.await_line("It seems your teammates have started without you")
        .await;
    late.await_eof().await;
}

#[tokio::test]
async fn test_game_timeout_fails_the_mission() {
    let addr = start_server(RoomConfig {
        game_timeout: Duration::from_millis(300),
        ..test_rooms()
    })
    .await;
    let (mut a1, mut a2, mut a3) = full_team(addr, "alpha").await;

    a1.send("/msg Glenda done").await;
    for client in [&mut a1, &mut a2, &mut a3] {
        client.await_line("corporate security noticed").await;
        client.await_eof().await;
    }
}

#[tokio::test]
async fn test_help_banner_and_malformed_lines() {
    let addr = start_server(test_rooms()).await;
    let (mut a1, _a2, _a3) = full_team(addr, "alpha").await;

    a1.send("/help").await;
    a1.await_line("Available commands").await;
    a1.await_line("/send [to] [filename]").await;

    a1.send("").await;
    a1.await_line("Invalid command").await;
    a1.send("/msg").await;
    a1.await_line("Invalid command").await;
}

#[tokio::test]
async fn test_two_rooms_do_not_interact() {
    let addr = start_server(test_rooms()).await;
    // Nicknames are room-scoped: both channels seat their own "a1".
    let (mut a1, _a2, _a3) = full_team(addr, "alpha").await;
    let (mut b1, mut b2, _b3) = full_team(addr, "bravo").await;

    a1.send("/msg * alpha only").await;
    a1.await_line("a1 | alpha only").await;

    b1.send("/msg * bravo only").await;
    // Had the alpha broadcast leaked, it would be queued ahead of this.
    assert_eq!(b2.next_line().await, "a1 | bravo only");
}
