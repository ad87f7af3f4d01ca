//! Server state and connection management.

use std::sync::Arc;

use crate::domain::{MessagePusher, RoomRepository};
use crate::infrastructure::timer::RaceScheduler;
use crate::usecase::{
    CreateRoomUseCase, FinishRaceUseCase, JoinRoomUseCase, LeaveRoomUseCase, StartGameUseCase,
    UpdateProgressUseCase,
};

/// Shared application state
pub struct AppState {
    /// CreateRoomUseCase（ルーム作成のユースケース）
    pub create_room_usecase: Arc<CreateRoomUseCase>,
    /// JoinRoomUseCase（ルーム参加のユースケース）
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    /// StartGameUseCase（レース開始のユースケース）
    pub start_game_usecase: Arc<StartGameUseCase>,
    /// UpdateProgressUseCase（進捗反映のユースケース）
    pub update_progress_usecase: Arc<UpdateProgressUseCase>,
    /// FinishRaceUseCase（レース終了のユースケース）
    pub finish_race_usecase: Arc<FinishRaceUseCase>,
    /// LeaveRoomUseCase（ルーム退出のユースケース）
    pub leave_room_usecase: Arc<LeaveRoomUseCase>,
    /// Room Repository（デバッグ表示・シャットダウン通知用）
    pub room_repository: Arc<dyn RoomRepository>,
    /// MessagePusher（シャットダウン通知用）
    pub message_pusher: Arc<dyn MessagePusher>,
    /// レース期限タイマー
    pub scheduler: Arc<RaceScheduler>,
}
