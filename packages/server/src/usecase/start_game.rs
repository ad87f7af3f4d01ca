//! UseCase: レース開始処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - StartGameUseCase::execute() メソッド
//! - レース開始処理（権限チェック、人数チェック、テキスト選択、進捗リセット）
//!
//! ### なぜこのテストが必要か
//! - ビジネスロジックの検証：オーナー以外・人数不足・二重開始を防ぐ
//! - 全クライアントが同一のテキストと開始時刻を受け取ることを保証
//! - 再戦（finished からの開始）で前レースの結果がリセットされることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：2 人以上の待機中ルームでの開始、finished からの再戦
//! - 異常系：非オーナーの開始要求、1 人での開始、進行中の二重開始

use std::sync::Arc;

use sokudo_shared::time::Clock;

use crate::domain::{
    MessagePusher, PlayerId, PlayerRepository, Room, RoomRepository, TextCatalog, Timestamp,
};

use super::error::CommandError;

/// レース開始の結果
#[derive(Debug, Clone)]
pub struct RaceStarted {
    /// 開始直後のルームのスナップショット
    pub room: Room,
    /// 全クライアントに配る共通の開始時刻
    pub started_at: Timestamp,
}

/// レース開始のユースケース
pub struct StartGameUseCase {
    /// Room Repository（データアクセス層の抽象化）
    room_repository: Arc<dyn RoomRepository>,
    /// Player Registry（接続 → ルームの索引）
    player_repository: Arc<dyn PlayerRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// TextCatalog（レーステキストの供給源）
    text_catalog: Arc<dyn TextCatalog>,
    /// Clock（時刻取得の抽象化）
    clock: Arc<dyn Clock>,
}

impl StartGameUseCase {
    /// 新しい StartGameUseCase を作成
    pub fn new(
        room_repository: Arc<dyn RoomRepository>,
        player_repository: Arc<dyn PlayerRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        text_catalog: Arc<dyn TextCatalog>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            room_repository,
            player_repository,
            message_pusher,
            text_catalog,
            clock,
        }
    }

    /// レース開始を実行
    ///
    /// 検証順序: Unauthorized → InsufficientPlayers → InvalidState。
    /// 成功時は選ばれたテキストと開始時刻が全プレイヤー共通で確定する。
    pub async fn execute(&self, requester: PlayerId) -> Result<RaceStarted, CommandError> {
        // 1. 要求者の所属ルームを解決
        let code = self
            .player_repository
            .room_of(requester)
            .await
            .ok_or(CommandError::NotInRoom)?;

        // 2. テキストを一様ランダムに選び、開始時刻を確定
        let text = self.text_catalog.pick_paragraph();
        let now = Timestamp::new(self.clock.now_millis());

        // 3. 状態遷移（検証込み、アトミック）
        let room = self
            .room_repository
            .start_race(&code, requester, text, now)
            .await?;

        Ok(RaceStarted {
            room,
            started_at: now,
        })
    }

    /// 開始イベントを全メンバーにブロードキャスト
    ///
    /// 全員が同一の text / startTime を受け取ることで、クライアントの
    /// 時計のずれに依存しない経過時間の計算が可能になる。
    pub async fn broadcast_game_started(
        &self,
        room: &Room,
        message: &str,
    ) -> Result<(), String> {
        self.message_pusher
            .broadcast(room.member_ids(), message)
            .await
            .map_err(|e| e.to_string())
    }
}
