//! UseCase: ルーム退出処理
//!
//! 明示的な leaveRoom コマンドと接続断の両方がこの UseCase を通る
//! （Gateway が接続断を退出として合成するため、処理は常に同一経路）。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LeaveRoomUseCase::execute() メソッド
//! - ルーム退出処理（オーナー引き継ぎ、ルーム破棄、レース中の退出）
//!
//! ### なぜこのテストが必要か
//! - ビジネスロジックの検証：オーナー退出後もルームが操作可能であり続ける
//! - 最後のプレイヤー退出でルームが即座に破棄されることを保証
//! - レース中の退出で残存者全員が完走済みなら早期終了がトリガーされること
//!
//! ### どのような状況を想定しているか
//! - 正常系：メンバーの退出、オーナーの退出
//! - エッジケース：最後のプレイヤーの退出、未所属プレイヤーの退出

use std::sync::Arc;

use crate::domain::{
    MessagePusher, PlayerId, PlayerRepository, RepositoryError, Room, RoomCode, RoomError,
    RoomRepository,
};

use super::error::CommandError;

/// ルーム退出の結果
#[derive(Debug, Clone)]
pub struct RoomLeft {
    /// 退出したルームのコード
    pub room_code: RoomCode,
    /// 退出後のルームのスナップショット（破棄された場合は None）
    pub room: Option<Room>,
    /// オーナーが引き継がれた場合の新オーナー
    pub reassigned_owner: Option<PlayerId>,
    /// 退出の結果、残存プレイヤー全員が完走済みになったか（早期終了のトリガー）
    pub race_complete: bool,
}

/// ルーム退出のユースケース
pub struct LeaveRoomUseCase {
    /// Room Repository（データアクセス層の抽象化）
    room_repository: Arc<dyn RoomRepository>,
    /// Player Registry（接続 → ルームの索引）
    player_repository: Arc<dyn PlayerRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl LeaveRoomUseCase {
    /// 新しい LeaveRoomUseCase を作成
    pub fn new(
        room_repository: Arc<dyn RoomRepository>,
        player_repository: Arc<dyn PlayerRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            room_repository,
            player_repository,
            message_pusher,
        }
    }

    /// ルーム退出を実行
    pub async fn execute(&self, player_id: PlayerId) -> Result<RoomLeft, CommandError> {
        // 1. ルーティング索引から所属ルームを解決しつつ解除
        let code = self
            .player_repository
            .unregister(player_id)
            .await
            .ok_or(CommandError::NotInRoom)?;

        // 2. MessagePusher からクライアントを登録解除
        self.message_pusher.unregister_client(&player_id).await;

        // 3. ルームから退出（最後の 1 人ならルームは破棄される）
        let removed = match self.room_repository.remove_player(&code, player_id).await {
            Ok(removed) => removed,
            // ルーム側に既にいない場合も索引の解除は完了しているので成功扱い
            Err(RepositoryError::RoomNotFound(_))
            | Err(RepositoryError::Room(RoomError::NotInRoom)) => {
                return Ok(RoomLeft {
                    room_code: code,
                    room: None,
                    reassigned_owner: None,
                    race_complete: false,
                });
            }
            Err(e) => return Err(e.into()),
        };

        let race_complete = removed
            .room
            .as_ref()
            .map(|room| room.all_finished())
            .unwrap_or(false);

        Ok(RoomLeft {
            room_code: code,
            room: removed.room,
            reassigned_owner: removed.reassigned_owner,
            race_complete,
        })
    }

    /// 退出を残存メンバーにブロードキャスト
    pub async fn broadcast_player_left(&self, room: &Room, message: &str) -> Result<(), String> {
        self.message_pusher
            .broadcast(room.member_ids(), message)
            .await
            .map_err(|e| e.to_string())
    }
}
