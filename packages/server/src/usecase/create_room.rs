//! UseCase: ルーム作成処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - CreateRoomUseCase::execute() メソッド
//! - ルーム作成処理（入力検証、コード発番、オーナー登録）
//!
//! ### なぜこのテストが必要か
//! - ビジネスロジックの検証：作成者がオーナーとして登録される
//! - Player Registry / MessagePusher への登録が揃って行われることを保証
//! - 不正な入力が ValidationError として拒否されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規ルームの作成
//! - 異常系：空のルーム名・プレイヤー名

use std::sync::Arc;

use sokudo_shared::time::Clock;

use crate::domain::{
    MessagePusher, Player, PlayerId, PlayerName, PlayerRepository, PusherChannel, Room,
    RoomName, RoomRepository, Timestamp,
};

use super::error::CommandError;

/// ルーム作成の結果
#[derive(Debug, Clone)]
pub struct RoomCreated {
    /// 作成直後のルームのスナップショット
    pub room: Room,
    /// 作成者に発行されたプレイヤー ID
    pub player_id: PlayerId,
}

/// ルーム作成のユースケース
pub struct CreateRoomUseCase {
    /// Room Repository（データアクセス層の抽象化）
    room_repository: Arc<dyn RoomRepository>,
    /// Player Registry（接続 → ルームの索引）
    player_repository: Arc<dyn PlayerRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// Clock（時刻取得の抽象化）
    clock: Arc<dyn Clock>,
}

impl CreateRoomUseCase {
    /// 新しい CreateRoomUseCase を作成
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

    /// ルーム作成を実行
    ///
    /// # Arguments
    ///
    /// * `room_name` - ルームの表示名（未検証の入力）
    /// * `is_private` - 非公開ルームかどうか
    /// * `player_name` - 作成者の表示名（未検証の入力）
    /// * `sender` - 作成者へのメッセージ送信用チャンネル
    pub async fn execute(
        &self,
        room_name: String,
        is_private: bool,
        player_name: String,
        sender: PusherChannel,
    ) -> Result<RoomCreated, CommandError> {
        // 1. 入力検証（値オブジェクトへの変換）
        let room_name = RoomName::new(room_name)?;
        let player_name = PlayerName::new(player_name)?;

        // 2. オーナーを作成し、ルームを発番・登録
        let player_id = PlayerId::generate();
        let now = Timestamp::new(self.clock.now_millis());
        let owner = Player::new(player_id, player_name, now);
        let room = self
            .room_repository
            .create_room(room_name, is_private, owner, now)
            .await?;

        // 3. ルーティング索引と MessagePusher に登録
        self.player_repository
            .register(player_id, room.code.clone())
            .await;
        self.message_pusher.register_client(player_id, sender).await;

        Ok(RoomCreated { room, player_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{GamePhase, MockMessagePusher},
        infrastructure::repository::{InMemoryPlayerRepository, InMemoryRoomRepository},
    };
    use sokudo_shared::time::FixedClock;

    fn create_usecase() -> (
        CreateRoomUseCase,
        Arc<InMemoryRoomRepository>,
        Arc<InMemoryPlayerRepository>,
    ) {
        let room_repository = Arc::new(InMemoryRoomRepository::new());
        let player_repository = Arc::new(InMemoryPlayerRepository::new());
        let mut message_pusher = MockMessagePusher::new();
        message_pusher
            .expect_register_client()
            .returning(|_, _| ());
        let usecase = CreateRoomUseCase::new(
            room_repository.clone(),
            player_repository.clone(),
            Arc::new(message_pusher),
            Arc::new(FixedClock::new(1000)),
        );
        (usecase, room_repository, player_repository)
    }

    #[tokio::test]
    async fn test_create_room_success() {
        // テスト項目: ルームが waiting 状態で作成され、作成者がオーナーになる
        // given (前提条件):
        let (usecase, room_repository, player_repository) = create_usecase();

        // when (操作):
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        let created = usecase
            .execute("Friday Race".to_string(), false, "alice".to_string(), tx)
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(created.room.name.as_str(), "Friday Race");
        assert_eq!(created.room.phase, GamePhase::Waiting);
        assert_eq!(created.room.owner_id, created.player_id);
        assert_eq!(created.room.players.len(), 1);
        assert!(created.room.players[0].is_owner);

        // Repository に登録されている
        let stored = room_repository.get_room(&created.room.code).await.unwrap();
        assert_eq!(stored.owner_id, created.player_id);

        // Player Registry がルームコードを引ける
        assert_eq!(
            player_repository.room_of(created.player_id).await,
            Some(created.room.code.clone())
        );
    }

    #[tokio::test]
    async fn test_create_room_trims_names() {
        // テスト項目: ルーム名・プレイヤー名の前後の空白が除去される
        // given (前提条件):
        let (usecase, _room_repository, _player_repository) = create_usecase();

        // when (操作):
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        let created = usecase
            .execute("  My Room  ".to_string(), true, "  bob  ".to_string(), tx)
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(created.room.name.as_str(), "My Room");
        assert_eq!(created.room.players[0].name.as_str(), "bob");
        assert!(created.room.is_private);
    }

    #[tokio::test]
    async fn test_create_room_rejects_empty_room_name() {
        // テスト項目: 空のルーム名が ValidationError で拒否される
        // given (前提条件):
        let (usecase, _room_repository, _player_repository) = create_usecase();

        // when (操作):
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        let result = usecase
            .execute("   ".to_string(), false, "alice".to_string(), tx)
            .await;

        // then (期待する結果):
        assert!(matches!(result, Err(CommandError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_room_rejects_empty_player_name() {
        // テスト項目: 空のプレイヤー名が ValidationError で拒否される
        // given (前提条件):
        let (usecase, room_repository, _player_repository) = create_usecase();

        // when (操作):
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        let result = usecase
            .execute("My Room".to_string(), false, "".to_string(), tx)
            .await;

        // then (期待する結果): ルームは作成されない
        assert!(matches!(result, Err(CommandError::Validation(_))));
        assert!(room_repository.list_rooms().await.is_empty());
    }

    #[tokio::test]
    async fn test_create_room_stamps_join_time_from_clock() {
        // テスト項目: オーナーの joinedAt が注入した Clock の時刻になる
        // given (前提条件):
        let (usecase, _room_repository, _player_repository) = create_usecase();

        // when (操作):
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        let created = usecase
            .execute("My Room".to_string(), false, "alice".to_string(), tx)
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(created.room.players[0].joined_at.value(), 1000);
        assert_eq!(created.room.created_at.value(), 1000);
    }
}
