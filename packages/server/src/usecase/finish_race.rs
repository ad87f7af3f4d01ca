//! UseCase: レース終了処理
//!
//! 「制限時間の経過」と「全員完走」のどちらの経路もここに合流する。
//! 既に終了しているルームに対しては何もしない（None を返す）ため、
//! 早期終了後に発火した古いタイマーがレースを二重に終了させることはない。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - FinishRaceUseCase::execute() メソッド
//! - レース終了処理（状態遷移、順位計算、冪等性）
//!
//! ### なぜこのテストが必要か
//! - ビジネスロジックの検証：順位がランキング規則の通りに計算される
//! - タイムアウトと全員完走が競合しても結果が一度しか確定しないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：進行中レースの終了と順位計算
//! - エッジケース：誰も完走していないタイムアウト、二重終了、破棄済みルーム

use std::sync::Arc;

use crate::domain::{
    MessagePusher, Player, PlayerId, RepositoryError, RoomCode, RoomError, RoomRepository,
    rank_players,
};

use super::error::CommandError;

/// レース終了の結果
#[derive(Debug, Clone)]
pub struct RaceFinished {
    pub room_code: RoomCode,
    /// 確定した最終順位（上位から順）
    pub rankings: Vec<Player>,
    /// 結果を通知する対象（終了時点の全メンバー）
    pub targets: Vec<PlayerId>,
}

/// レース終了のユースケース
pub struct FinishRaceUseCase {
    /// Room Repository（データアクセス層の抽象化）
    room_repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl FinishRaceUseCase {
    /// 新しい FinishRaceUseCase を作成
    pub fn new(
        room_repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            room_repository,
            message_pusher,
        }
    }

    /// レース終了を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Some(RaceFinished))` - レースを終了し順位を確定した
    /// * `Ok(None)` - ルームが進行中でない（既に終了済み・破棄済み）ため何もしなかった
    pub async fn execute(&self, code: &RoomCode) -> Result<Option<RaceFinished>, CommandError> {
        let room = match self.room_repository.finish_race(code).await {
            Ok(room) => room,
            // 全員完走による早期終了とタイムアウトの競合、またはルーム破棄後の
            // タイマー発火。どちらも正常系として無視する。
            Err(RepositoryError::Room(RoomError::RaceNotStarted))
            | Err(RepositoryError::RoomNotFound(_)) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        Ok(Some(RaceFinished {
            room_code: room.code.clone(),
            targets: room.member_ids(),
            rankings: rank_players(&room.players),
        }))
    }

    /// 終了イベント（最終順位）を全メンバーにブロードキャスト
    pub async fn broadcast_game_ended(
        &self,
        targets: Vec<PlayerId>,
        message: &str,
    ) -> Result<(), String> {
        self.message_pusher
            .broadcast(targets, message)
            .await
            .map_err(|e| e.to_string())
    }
}
