//! WebSocket client session management.

use futures_util::{SinkExt, StreamExt};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use sokudo_server::infrastructure::dto::websocket::{ClientMessage, PlayerDto, ServerMessage};

use super::error::ClientError;

/// How a client session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The user exited (/quit or Ctrl+C/Ctrl+D); don't reconnect
    UserExit,
    /// The server closed the connection or the send path failed
    ConnectionClosed,
}

/// Run one WebSocket client session
pub async fn run_client_session(
    url: &str,
    player_name: &str,
) -> Result<SessionEnd, Box<dyn std::error::Error>> {
    let (ws_stream, _response) = connect_async(url)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    tracing::info!("Connected to typing-race server!");
    println!(
        "\nYou are '{}'. Commands: /create <room name>, /join <code>, /start, \
         /progress <percent> <wpm>, /leave, /quit\n",
        player_name
    );

    let (mut write, mut read) = ws_stream.split();

    // Spawn a task to print the events the room broadcasts
    let read_task = tokio::spawn(async move {
        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    match serde_json::from_str::<ServerMessage>(&text) {
                        Ok(event) => print!("{}", format_event(&event)),
                        // If parsing fails, display as raw text
                        Err(_) => println!("\r<- {}", text),
                    }
                    redisplay_prompt();
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            }
        }
    });

    // Read commands from stdin and send them to the server
    let mut editor = DefaultEditor::new()?;
    let end = loop {
        if read_task.is_finished() {
            break SessionEnd::ConnectionClosed;
        }

        let line = match editor.readline("> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                break SessionEnd::UserExit;
            }
            Err(e) => {
                tracing::error!("Input error: {}", e);
                break SessionEnd::UserExit;
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "/quit" {
            break SessionEnd::UserExit;
        }

        match parse_command(line, player_name) {
            Ok(message) => {
                let json = serde_json::to_string(&message)?;
                if write.send(Message::Text(json.into())).await.is_err() {
                    break SessionEnd::ConnectionClosed;
                }
            }
            Err(usage) => println!("{}", usage),
        }
    };

    read_task.abort();
    Ok(end)
}

/// Parse a slash command into a protocol message
fn parse_command(line: &str, player_name: &str) -> Result<ClientMessage, String> {
    let (command, rest) = match line.split_once(' ') {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    match command {
        "/create" => {
            if rest.is_empty() {
                return Err("usage: /create <room name>".to_string());
            }
            Ok(ClientMessage::CreateRoom {
                room_name: rest.to_string(),
                is_private: false,
                player_name: player_name.to_string(),
            })
        }
        "/join" => {
            if rest.is_empty() {
                return Err("usage: /join <room code>".to_string());
            }
            Ok(ClientMessage::JoinRoom {
                room_code: rest.to_string(),
                player_name: player_name.to_string(),
            })
        }
        "/start" => Ok(ClientMessage::StartGame {}),
        "/progress" => {
            let mut parts = rest.split_whitespace();
            let progress = parts.next().and_then(|p| p.parse::<i64>().ok());
            let wpm = parts.next().and_then(|w| w.parse::<i64>().ok());
            match (progress, wpm) {
                (Some(progress), Some(wpm)) => Ok(ClientMessage::UpdateProgress {
                    typed_text: String::new(),
                    wpm,
                    progress,
                }),
                _ => Err("usage: /progress <percent> <wpm>".to_string()),
            }
        }
        "/leave" => Ok(ClientMessage::LeaveRoom {}),
        _ => Err(format!("unknown command: {}", command)),
    }
}

/// Format a server event for terminal display
fn format_event(event: &ServerMessage) -> String {
    match event {
        ServerMessage::RoomCreated { room, .. } => format!(
            "\r*** room '{}' created! share code {} to invite players\n",
            room.name, room.code
        ),
        ServerMessage::RoomJoined { room, .. } => format!(
            "\r*** joined room '{}' ({})\n{}",
            room.name,
            room.code,
            format_standings(&room.players)
        ),
        ServerMessage::PlayerJoined { room } => format!(
            "\r*** a player joined ({} players)\n{}",
            room.players.len(),
            format_standings(&room.players)
        ),
        ServerMessage::PlayerLeft { room } => format!(
            "\r*** a player left ({} players)\n{}",
            room.players.len(),
            format_standings(&room.players)
        ),
        ServerMessage::GameStarted { text, .. } => {
            format!("\r*** race started! type this:\n    {}\n", text)
        }
        ServerMessage::ProgressUpdate { players } => {
            format!("\r--- live standings ---\n{}", format_standings(players))
        }
        ServerMessage::GameEnded { rankings } => {
            let mut out = String::from("\r*** final rankings ***\n");
            for (place, player) in rankings.iter().enumerate() {
                out.push_str(&format!(
                    "    {}. {} - {} wpm, {}%{}\n",
                    place + 1,
                    player.name,
                    player.wpm,
                    player.progress,
                    if player.is_finished { "" } else { " (did not finish)" }
                ));
            }
            out
        }
        ServerMessage::RoomDestroyed { message } => {
            format!("\r*** room closed: {}\n", message)
        }
        ServerMessage::Error { message } => format!("\r!!! error: {}\n", message),
    }
}

fn format_standings(players: &[PlayerDto]) -> String {
    let mut out = String::new();
    for player in players {
        out.push_str(&format!(
            "    {}{} - {} wpm, {}%{}\n",
            player.name,
            if player.is_owner { " (owner)" } else { "" },
            player.wpm,
            player.progress,
            if player.is_finished { " ✓" } else { "" }
        ));
    }
    out
}

/// Redisplay the prompt after printing an event
fn redisplay_prompt() {
    use std::io::Write;
    print!("> ");
    std::io::stdout().flush().ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_create_command() {
        // テスト項目: /create がルーム名とプレイヤー名を持つ createRoom になる
        // given (前提条件):
        let line = "/create Friday Night Race";

        // when (操作):
        let message = parse_command(line, "alice").unwrap();

        // then (期待する結果):
        assert_eq!(
            message,
            ClientMessage::CreateRoom {
                room_name: "Friday Night Race".to_string(),
                is_private: false,
                player_name: "alice".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_join_command() {
        // テスト項目: /join がルームコードを持つ joinRoom になる
        // given (前提条件):
        let line = "/join ab3xyz";

        // when (操作):
        let message = parse_command(line, "bob").unwrap();

        // then (期待する結果): コードの正規化はサーバー側の責務なのでそのまま送る
        assert_eq!(
            message,
            ClientMessage::JoinRoom {
                room_code: "ab3xyz".to_string(),
                player_name: "bob".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_progress_command() {
        // テスト項目: /progress <percent> <wpm> が updateProgress になる
        // given (前提条件):
        let line = "/progress 80 62";

        // when (操作):
        let message = parse_command(line, "alice").unwrap();

        // then (期待する結果):
        assert_eq!(
            message,
            ClientMessage::UpdateProgress {
                typed_text: String::new(),
                wpm: 62,
                progress: 80,
            }
        );
    }

    #[test]
    fn test_parse_start_and_leave_commands() {
        // テスト項目: /start と /leave が空ペイロードのコマンドになる
        // given (前提条件) / when (操作) / then (期待する結果):
        assert_eq!(
            parse_command("/start", "alice").unwrap(),
            ClientMessage::StartGame {}
        );
        assert_eq!(
            parse_command("/leave", "alice").unwrap(),
            ClientMessage::LeaveRoom {}
        );
    }

    #[test]
    fn test_parse_rejects_missing_arguments() {
        // テスト項目: 引数の欠けたコマンドが usage エラーになる
        // given (前提条件) / when (操作) / then (期待する結果):
        assert!(parse_command("/create", "alice").is_err());
        assert!(parse_command("/join", "alice").is_err());
        assert!(parse_command("/progress 80", "alice").is_err());
        assert!(parse_command("/progress", "alice").is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_command() {
        // テスト項目: 未知のコマンドがエラーになる
        // given (前提条件):
        let line = "/teleport home";

        // when (操作):
        let result = parse_command(line, "alice");

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_format_game_ended_marks_unfinished_players() {
        // テスト項目: 最終順位の表示で未完走プレイヤーに印が付く
        // given (前提条件):
        let rankings = vec![
            PlayerDto {
                id: "1".to_string(),
                name: "alice".to_string(),
                is_owner: true,
                wpm: 70,
                progress: 100,
                is_finished: true,
            },
            PlayerDto {
                id: "2".to_string(),
                name: "bob".to_string(),
                is_owner: false,
                wpm: 50,
                progress: 80,
                is_finished: false,
            },
        ];

        // when (操作):
        let output = format_event(&ServerMessage::GameEnded { rankings });

        // then (期待する結果):
        assert!(output.contains("1. alice"));
        assert!(output.contains("2. bob"));
        assert!(output.contains("(did not finish)"));
    }
}
