//! UseCase 層
//!
//! クライアントからの 1 コマンド = 1 UseCase。各 UseCase は Repository /
//! MessagePusher / TextCatalog の trait にのみ依存し、WebSocket などの
//! 具体的な通信手段には依存しません。
//!
//! レース終了は「制限時間の経過」と「全員完走」の 2 つの経路があり、
//! どちらも `FinishRaceUseCase` に合流します。

pub mod create_room;
pub mod error;
pub mod finish_race;
pub mod join_room;
pub mod leave_room;
pub mod start_game;
pub mod update_progress;

pub use create_room::{CreateRoomUseCase, RoomCreated};
pub use error::CommandError;
pub use finish_race::{FinishRaceUseCase, RaceFinished};
pub use join_room::{JoinRoomUseCase, RoomJoined};
pub use leave_room::{LeaveRoomUseCase, RoomLeft};
pub use start_game::{RaceStarted, StartGameUseCase};
pub use update_progress::UpdateProgressUseCase;
