//! UseCase: ルーム参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - ルーム参加処理（コード正規化、途中参加の拒否、参加順の維持）
//!
//! ### なぜこのテストが必要か
//! - ビジネスロジックの検証：レース進行中の途中参加を防ぐ
//! - ルームコードが大文字小文字を区別せず解決されることを保証
//! - Room / Player Registry の双方向一貫性を確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：待機中ルームへの参加
//! - 異常系：存在しないコード、進行中ルームへの参加

use std::sync::Arc;

use sokudo_shared::time::Clock;

use crate::domain::{
    MessagePusher, Player, PlayerId, PlayerName, PlayerRepository, PusherChannel, Room,
    RoomCode, RoomRepository, Timestamp,
};

use super::error::CommandError;

/// ルーム参加の結果
#[derive(Debug, Clone)]
pub struct RoomJoined {
    /// 参加後のルームのスナップショット
    pub room: Room,
    /// 参加者に発行されたプレイヤー ID
    pub player_id: PlayerId,
}

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    /// Room Repository（データアクセス層の抽象化）
    room_repository: Arc<dyn RoomRepository>,
    /// Player Registry（接続 → ルームの索引）
    player_repository: Arc<dyn PlayerRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// Clock（時刻取得の抽象化）
    clock: Arc<dyn Clock>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(
        room_repository: Arc<dyn RoomRepository>,
        player_repository: Arc<dyn PlayerRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            room_repository,
            player_repository,
            message_pusher,
            clock,
        }
    }

    /// ルーム参加を実行
    ///
    /// # Arguments
    ///
    /// * `room_code` - 参加先のルームコード（大文字に正規化される）
    /// * `player_name` - 参加者の表示名（未検証の入力）
    /// * `sender` - 参加者へのメッセージ送信用チャンネル
    pub async fn execute(
        &self,
        room_code: String,
        player_name: String,
        sender: PusherChannel,
    ) -> Result<RoomJoined, CommandError> {
        // 1. 入力検証（値オブジェクトへの変換）
        let code = RoomCode::new(room_code)?;
        let player_name = PlayerName::new(player_name)?;

        // 2. プレイヤーを作成してルームに追加（進行中なら失敗）
        let player_id = PlayerId::generate();
        let now = Timestamp::new(self.clock.now_millis());
        let player = Player::new(player_id, player_name, now);
        let room = self.room_repository.add_player(&code, player).await?;

        // 3. ルーティング索引と MessagePusher に登録
        self.player_repository.register(player_id, code).await;
        self.message_pusher.register_client(player_id, sender).await;

        Ok(RoomJoined { room, player_id })
    }

    /// 参加を既存メンバーにブロードキャスト
    ///
    /// # Arguments
    ///
    /// * `room` - 参加後のルームのスナップショット
    /// * `new_player_id` - 新規参加者（通知対象から除外する）
    /// * `message` - ブロードキャストするメッセージ（JSON）
    pub async fn broadcast_player_joined(
        &self,
        room: &Room,
        new_player_id: PlayerId,
        message: &str,
    ) -> Result<(), String> {
        let targets: Vec<PlayerId> = room
            .member_ids()
            .into_iter()
            .filter(|id| *id != new_player_id)
            .collect();
        self.message_pusher
            .broadcast(targets, message)
            .await
            .map_err(|e| e.to_string())
    }
}
