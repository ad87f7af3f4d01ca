//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::domain::{MessagePusher, RoomRepository};
use crate::infrastructure::dto::websocket::ServerMessage;
use crate::infrastructure::timer::RaceScheduler;
use crate::usecase::{
    CreateRoomUseCase, FinishRaceUseCase, JoinRoomUseCase, LeaveRoomUseCase, StartGameUseCase,
    UpdateProgressUseCase,
};

use super::{
    handler::{debug_rooms, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// WebSocket typing-race server
///
/// This struct encapsulates the server configuration and provides methods to run the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     create_room_usecase,
///     join_room_usecase,
///     start_game_usecase,
///     update_progress_usecase,
///     finish_race_usecase,
///     leave_room_usecase,
///     room_repository,
///     message_pusher,
///     scheduler,
/// );
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    /// CreateRoomUseCase（ルーム作成のユースケース）
    create_room_usecase: Arc<CreateRoomUseCase>,
    /// JoinRoomUseCase（ルーム参加のユースケース）
    join_room_usecase: Arc<JoinRoomUseCase>,
    /// StartGameUseCase（レース開始のユースケース）
    start_game_usecase: Arc<StartGameUseCase>,
    /// UpdateProgressUseCase（進捗反映のユースケース）
    update_progress_usecase: Arc<UpdateProgressUseCase>,
    /// FinishRaceUseCase（レース終了のユースケース）
    finish_race_usecase: Arc<FinishRaceUseCase>,
    /// LeaveRoomUseCase（ルーム退出のユースケース）
    leave_room_usecase: Arc<LeaveRoomUseCase>,
    /// Room Repository（デバッグ表示・シャットダウン通知用）
    room_repository: Arc<dyn RoomRepository>,
    /// MessagePusher（シャットダウン通知用）
    message_pusher: Arc<dyn MessagePusher>,
    /// レース期限タイマー
    scheduler: Arc<RaceScheduler>,
}

impl Server {
    /// Create a new Server instance
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        create_room_usecase: Arc<CreateRoomUseCase>,
        join_room_usecase: Arc<JoinRoomUseCase>,
        start_game_usecase: Arc<StartGameUseCase>,
        update_progress_usecase: Arc<UpdateProgressUseCase>,
        finish_race_usecase: Arc<FinishRaceUseCase>,
        leave_room_usecase: Arc<LeaveRoomUseCase>,
        room_repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        scheduler: Arc<RaceScheduler>,
    ) -> Self {
        Self {
            create_room_usecase,
            join_room_usecase,
            start_game_usecase,
            update_progress_usecase,
            finish_race_usecase,
            leave_room_usecase,
            room_repository,
            message_pusher,
            scheduler,
        }
    }

    /// Run the WebSocket typing-race server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app_state = Arc::new(AppState {
            create_room_usecase: self.create_room_usecase,
            join_room_usecase: self.join_room_usecase,
            start_game_usecase: self.start_game_usecase,
            update_progress_usecase: self.update_progress_usecase,
            finish_race_usecase: self.finish_race_usecase,
            leave_room_usecase: self.leave_room_usecase,
            room_repository: self.room_repository,
            message_pusher: self.message_pusher,
            scheduler: self.scheduler,
        });

        // Define handlers
        let app = Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/debug/rooms", get(debug_rooms))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state.clone());

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        // Start the server
        tracing::info!(
            "WebSocket typing-race server listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        // Set up graceful shutdown: live rooms are notified before the
        // listener stops, so clients are not left staring at a dead race.
        let shutdown_state = app_state.clone();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown_signal().await;
                notify_shutdown(&shutdown_state).await;
            })
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

/// Broadcast `roomDestroyed` to every live room and drop all race deadlines.
async fn notify_shutdown(state: &Arc<AppState>) {
    let rooms = state.room_repository.list_rooms().await;
    if rooms.is_empty() {
        return;
    }

    tracing::info!("Notifying {} live room(s) of shutdown", rooms.len());
    let destroyed_json = serde_json::to_string(&ServerMessage::RoomDestroyed {
        message: "server is shutting down".to_string(),
    })
    .unwrap();
    for room in rooms {
        if let Err(e) = state
            .message_pusher
            .broadcast(room.member_ids(), &destroyed_json)
            .await
        {
            tracing::warn!(
                "Failed to notify room '{}' of shutdown: {}",
                room.code.as_str(),
                e
            );
        }
    }
    state.scheduler.cancel_all().await;
}
