//! WebSocket connection gateway.
//!
//! Terminates client connections, parses inbound `{type, payload}` messages
//! into the closed `ClientMessage` union, routes them to the use cases and
//! serializes outbound events. Acks and errors go to the sender only; state
//! changes are broadcast room-wide. On connection loss the gateway
//! synthesizes a `leaveRoom`, so departure handling is uniform whether
//! graceful or abrupt.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{PlayerId, PusherChannel, RACE_DURATION, RoomCode},
    infrastructure::dto::websocket::{ClientMessage, PlayerDto, RoomDto, ServerMessage},
    usecase::CommandError,
};

use super::super::state::AppState;

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Spawns a task that receives messages from the rx channel and pushes them
/// to the WebSocket sender.
///
/// This is the only send path to a connection, so a client always observes
/// events in the order the room produced them.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            // Send the message to this client
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

pub async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, mut receiver) = socket.split();

    // Create a channel for this client to receive messages
    let (tx, rx) = mpsc::unbounded_channel();
    let send_task = pusher_loop(rx, sender);

    // The connection's player context: None until createRoom/joinRoom succeeds
    let mut player: Option<PlayerId> = None;

    while let Some(message) = receiver.next().await {
        let message = match message {
            Ok(message) => message,
            Err(e) => {
                tracing::error!("WebSocket error: {}", e);
                break;
            }
        };

        match message {
            Message::Text(text) => {
                dispatch(&state, &mut player, &tx, &text).await;
            }
            Message::Ping(_) => {
                tracing::debug!("Received ping");
                // Ping/pong is handled automatically by the WebSocket protocol
            }
            Message::Close(_) => {
                tracing::info!("Client requested close");
                break;
            }
            _ => {}
        }
    }

    // Synthesize a leaveRoom for a connection that was still in a room,
    // so abrupt disconnects take the same departure path as explicit leaves.
    if let Some(player_id) = player {
        tracing::info!("Connection lost for player '{}', leaving room", player_id);
        handle_leave(&state, player_id).await;
    }

    send_task.abort();
}

/// Dispatch one inbound message to the matching command handler.
async fn dispatch(
    state: &Arc<AppState>,
    player: &mut Option<PlayerId>,
    tx: &PusherChannel,
    text: &str,
) {
    let message = match serde_json::from_str::<ClientMessage>(text) {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!("Failed to parse message as JSON: {}", e);
            send_error(
                tx,
                &CommandError::Validation("malformed message".to_string()),
            );
            return;
        }
    };

    match message {
        ClientMessage::CreateRoom {
            room_name,
            is_private,
            player_name,
        } => {
            handle_create_room(state, player, tx, room_name, is_private, player_name).await;
        }
        ClientMessage::JoinRoom {
            room_code,
            player_name,
        } => {
            handle_join_room(state, player, tx, room_code, player_name).await;
        }
        ClientMessage::StartGame {} => {
            handle_start_game(state, *player, tx).await;
        }
        ClientMessage::UpdateProgress {
            typed_text,
            wpm,
            progress,
        } => {
            handle_update_progress(state, *player, tx, &typed_text, wpm, progress).await;
        }
        ClientMessage::LeaveRoom {} => match player.take() {
            Some(player_id) => handle_leave(state, player_id).await,
            None => send_error(tx, &CommandError::NotInRoom),
        },
    }
}

async fn handle_create_room(
    state: &Arc<AppState>,
    player: &mut Option<PlayerId>,
    tx: &PusherChannel,
    room_name: String,
    is_private: bool,
    player_name: String,
) {
    if player.is_some() {
        send_error(
            tx,
            &CommandError::InvalidState("you are already in a room".to_string()),
        );
        return;
    }

    match state
        .create_room_usecase
        .execute(room_name, is_private, player_name, tx.clone())
        .await
    {
        Ok(created) => {
            tracing::info!(
                "Player '{}' created room '{}'",
                created.player_id,
                created.room.code.as_str()
            );
            *player = Some(created.player_id);
            send_to_connection(
                tx,
                &ServerMessage::RoomCreated {
                    room: RoomDto::from(&created.room),
                    player_id: created.player_id.to_string(),
                },
            );
        }
        Err(e) => send_error(tx, &e),
    }
}

async fn handle_join_room(
    state: &Arc<AppState>,
    player: &mut Option<PlayerId>,
    tx: &PusherChannel,
    room_code: String,
    player_name: String,
) {
    if player.is_some() {
        send_error(
            tx,
            &CommandError::InvalidState("you are already in a room".to_string()),
        );
        return;
    }

    match state
        .join_room_usecase
        .execute(room_code, player_name, tx.clone())
        .await
    {
        Ok(joined) => {
            tracing::info!(
                "Player '{}' joined room '{}'",
                joined.player_id,
                joined.room.code.as_str()
            );
            *player = Some(joined.player_id);
            let room_dto = RoomDto::from(&joined.room);

            // Ack to the joiner
            send_to_connection(
                tx,
                &ServerMessage::RoomJoined {
                    room: room_dto.clone(),
                    player_id: joined.player_id.to_string(),
                },
            );

            // Notify the existing members
            let joined_json = serde_json::to_string(&ServerMessage::PlayerJoined {
                room: room_dto,
            })
            .unwrap();
            if let Err(e) = state
                .join_room_usecase
                .broadcast_player_joined(&joined.room, joined.player_id, &joined_json)
                .await
            {
                tracing::warn!("Failed to broadcast player-joined: {}", e);
            }
        }
        Err(e) => send_error(tx, &e),
    }
}

async fn handle_start_game(state: &Arc<AppState>, player: Option<PlayerId>, tx: &PusherChannel) {
    let Some(player_id) = player else {
        send_error(tx, &CommandError::NotInRoom);
        return;
    };

    match state.start_game_usecase.execute(player_id).await {
        Ok(started) => {
            let code = started.room.code.clone();
            tracing::info!("Race started in room '{}'", code.as_str());

            // Every member receives the same text and the same start timestamp,
            // so elapsed-time computation is consistent across clients.
            let started_json = serde_json::to_string(&ServerMessage::GameStarted {
                text: started.room.current_text.clone(),
                start_time: started.started_at.value(),
            })
            .unwrap();
            if let Err(e) = state
                .start_game_usecase
                .broadcast_game_started(&started.room, &started_json)
                .await
            {
                tracing::warn!("Failed to broadcast game-started: {}", e);
            }

            // Arm the race deadline. The timer is owned by the room's lifetime
            // and cancelled from every path that ends the race early.
            let deadline_state = state.clone();
            let deadline_code = code.clone();
            state
                .scheduler
                .schedule(code, RACE_DURATION, async move {
                    finish_race_and_broadcast(&deadline_state, deadline_code).await;
                })
                .await;
        }
        Err(e) => send_error(tx, &e),
    }
}

async fn handle_update_progress(
    state: &Arc<AppState>,
    player: Option<PlayerId>,
    tx: &PusherChannel,
    typed_text: &str,
    wpm: i64,
    progress: i64,
) {
    let Some(player_id) = player else {
        send_error(tx, &CommandError::NotInRoom);
        return;
    };

    match state
        .update_progress_usecase
        .execute(player_id, typed_text, wpm, progress)
        .await
    {
        Ok(snapshot) => {
            let progress_json = serde_json::to_string(&ServerMessage::ProgressUpdate {
                players: snapshot.players.iter().map(PlayerDto::from).collect(),
            })
            .unwrap();
            if let Err(e) = state
                .update_progress_usecase
                .broadcast_progress(&snapshot, &progress_json)
                .await
            {
                tracing::warn!("Failed to broadcast progress-update: {}", e);
            }

            // Early completion: everyone finished before the deadline
            if snapshot.all_finished {
                finish_race_and_broadcast(state, snapshot.room_code.clone()).await;
            }
        }
        Err(e) => send_error(tx, &e),
    }
}

async fn handle_leave(state: &Arc<AppState>, player_id: PlayerId) {
    match state.leave_room_usecase.execute(player_id).await {
        Ok(left) => {
            if let Some(room) = &left.room {
                tracing::info!(
                    "Player '{}' left room '{}'",
                    player_id,
                    left.room_code.as_str()
                );
                let left_json = serde_json::to_string(&ServerMessage::PlayerLeft {
                    room: RoomDto::from(room),
                })
                .unwrap();
                if let Err(e) = state
                    .leave_room_usecase
                    .broadcast_player_left(room, &left_json)
                    .await
                {
                    tracing::warn!("Failed to broadcast player-left: {}", e);
                }

                // The departed player may have been the last one still typing
                if left.race_complete {
                    finish_race_and_broadcast(state, left.room_code.clone()).await;
                }
            } else {
                tracing::info!("Room '{}' destroyed", left.room_code.as_str());
                state.scheduler.cancel(&left.room_code).await;
            }
        }
        Err(e) => {
            tracing::warn!("Failed to remove player '{}': {}", player_id, e);
        }
    }
}

/// Finish a race and broadcast the final rankings.
///
/// Converging point for the deadline-timeout path, the all-finished path and
/// the leave-completes-race path. A no-op if the race is already over, so a
/// stale deadline firing after early completion has no effect.
async fn finish_race_and_broadcast(state: &Arc<AppState>, code: RoomCode) {
    match state.finish_race_usecase.execute(&code).await {
        Ok(Some(finished)) => {
            tracing::info!("Race finished in room '{}'", code.as_str());
            let ended_json = serde_json::to_string(&ServerMessage::GameEnded {
                rankings: finished.rankings.iter().map(PlayerDto::from).collect(),
            })
            .unwrap();
            if let Err(e) = state
                .finish_race_usecase
                .broadcast_game_ended(finished.targets, &ended_json)
                .await
            {
                tracing::warn!("Failed to broadcast game-ended: {}", e);
            }
            state.scheduler.cancel(&code).await;
        }
        Ok(None) => {
            // Race already finished by another path, or the room is gone
        }
        Err(e) => {
            tracing::warn!("Failed to finish race in room '{}': {}", code.as_str(), e);
        }
    }
}

fn send_to_connection(tx: &PusherChannel, message: &ServerMessage) {
    let json = serde_json::to_string(message).unwrap();
    if tx.send(json).is_err() {
        tracing::warn!("Failed to send message to connection (already closed)");
    }
}

fn send_error(tx: &PusherChannel, error: &CommandError) {
    send_to_connection(
        tx,
        &ServerMessage::Error {
            message: error.to_string(),
        },
    );
}
