//! Multiplayer typing-race coordination server.
//!
//! Players connect over WebSocket, create or join a room by code, race
//! against a shared paragraph and receive live progress broadcasts.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin sokudo-server
//! cargo run --bin sokudo-server -- --host 0.0.0.0 --port 3000
//! ```

use std::sync::Arc;

use clap::Parser;

use sokudo_server::{
    infrastructure::{
        InMemoryPlayerRepository, InMemoryRoomRepository, RaceScheduler, StaticTextCatalog,
        WebSocketMessagePusher,
    },
    ui::Server,
    usecase::{
        CreateRoomUseCase, FinishRaceUseCase, JoinRoomUseCase, LeaveRoomUseCase,
        StartGameUseCase, UpdateProgressUseCase,
    },
};
use sokudo_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "sokudo-server")]
#[command(about = "Multiplayer typing-race server over WebSocket", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Repositories
    // 2. MessagePusher / TextCatalog / Clock / Scheduler
    // 3. UseCases
    // 4. Server

    // 1. Create Repositories (in-memory database)
    let room_repository = Arc::new(InMemoryRoomRepository::new());
    let player_repository = Arc::new(InMemoryPlayerRepository::new());

    // 2. Create collaborators
    let message_pusher = Arc::new(WebSocketMessagePusher::new());
    let text_catalog = Arc::new(StaticTextCatalog::new());
    let clock = Arc::new(SystemClock);
    let scheduler = Arc::new(RaceScheduler::new());

    // 3. Create UseCases
    let create_room_usecase = Arc::new(CreateRoomUseCase::new(
        room_repository.clone(),
        player_repository.clone(),
        message_pusher.clone(),
        clock.clone(),
    ));
    let join_room_usecase = Arc::new(JoinRoomUseCase::new(
        room_repository.clone(),
        player_repository.clone(),
        message_pusher.clone(),
        clock.clone(),
    ));
    let start_game_usecase = Arc::new(StartGameUseCase::new(
        room_repository.clone(),
        player_repository.clone(),
        message_pusher.clone(),
        text_catalog,
        clock.clone(),
    ));
    let update_progress_usecase = Arc::new(UpdateProgressUseCase::new(
        room_repository.clone(),
        player_repository.clone(),
        message_pusher.clone(),
        clock,
    ));
    let finish_race_usecase = Arc::new(FinishRaceUseCase::new(
        room_repository.clone(),
        message_pusher.clone(),
    ));
    let leave_room_usecase = Arc::new(LeaveRoomUseCase::new(
        room_repository.clone(),
        player_repository,
        message_pusher.clone(),
    ));

    // 4. Create and run the server
    let server = Server::new(
        create_room_usecase,
        join_room_usecase,
        start_game_usecase,
        update_progress_usecase,
        finish_race_usecase,
        leave_room_usecase,
        room_repository,
        message_pusher,
        scheduler,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
