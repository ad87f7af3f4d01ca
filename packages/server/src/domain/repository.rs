//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! ルームの状態を変更する操作はすべてこの trait を経由し、各操作は
//! 同一ルームに対してアトミックに適用されます。

use async_trait::async_trait;

use super::entity::{Player, Room};
use super::error::RepositoryError;
use super::value_object::{PlayerId, RoomCode, RoomName, Timestamp};

/// プレイヤー退出の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedPlayer {
    /// 退出後のルームのスナップショット（ルームが破棄された場合は None）
    pub room: Option<Room>,
    /// オーナーが引き継がれた場合の新オーナー
    pub reassigned_owner: Option<PlayerId>,
}

/// 進捗反映後のルーム状態のスナップショット
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub room_code: RoomCode,
    /// 参加順のプレイヤー一覧（ブロードキャスト用）
    pub players: Vec<Player>,
    /// 全プレイヤーが完走したか（早期終了のトリガー）
    pub all_finished: bool,
}

/// Room Repository trait
///
/// ライブなルーム群の唯一の所有者。ルームコードの発番・衝突回避も
/// この trait の実装が担う。
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// 新しいルームを作成し、オーナーを最初のメンバーとして登録する
    ///
    /// 使用中でないルームコードを生成して割り当てる（衝突時は再生成）。
    async fn create_room(
        &self,
        name: RoomName,
        is_private: bool,
        owner: Player,
        created_at: Timestamp,
    ) -> Result<Room, RepositoryError>;

    /// ルームのスナップショットを取得
    async fn get_room(&self, code: &RoomCode) -> Result<Room, RepositoryError>;

    /// プレイヤーをルームに追加（レース進行中は失敗）
    async fn add_player(&self, code: &RoomCode, player: Player)
    -> Result<Room, RepositoryError>;

    /// プレイヤーをルームから退出させる
    ///
    /// 最後のプレイヤーが退出した場合はルームを破棄する。
    async fn remove_player(
        &self,
        code: &RoomCode,
        player_id: PlayerId,
    ) -> Result<RemovedPlayer, RepositoryError>;

    /// レースを開始する（検証と状態遷移をアトミックに行う）
    async fn start_race(
        &self,
        code: &RoomCode,
        requester: PlayerId,
        text: String,
        now: Timestamp,
    ) -> Result<Room, RepositoryError>;

    /// 進捗報告を反映し、反映後のスナップショットを返す
    async fn apply_progress(
        &self,
        code: &RoomCode,
        player_id: PlayerId,
        reported_wpm: i64,
        reported_progress: i64,
        now: Timestamp,
    ) -> Result<ProgressSnapshot, RepositoryError>;

    /// レースを終了させ、終了時点のスナップショットを返す
    async fn finish_race(&self, code: &RoomCode) -> Result<Room, RepositoryError>;

    /// ライブな全ルームのスナップショットを取得（デバッグ・シャットダウン用）
    async fn list_rooms(&self) -> Vec<Room>;
}

/// Player Registry trait
///
/// 接続（プレイヤー ID）から所属ルームへのルーティング索引。
/// ルームの `players` とこの索引の双方向一貫性は UseCase 層が維持する。
#[async_trait]
pub trait PlayerRepository: Send + Sync {
    /// プレイヤーを所属ルームに紐付ける
    async fn register(&self, player_id: PlayerId, code: RoomCode);

    /// プレイヤーの紐付けを解除し、所属していたルームコードを返す
    async fn unregister(&self, player_id: PlayerId) -> Option<RoomCode>;

    /// プレイヤーの所属ルームコードを取得
    async fn room_of(&self, player_id: PlayerId) -> Option<RoomCode>;
}
