//! UseCase: 進捗反映処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - UpdateProgressUseCase::execute() メソッド
//! - 進捗反映処理（数値のクランプ、完走ラッチ、全員完走の検知）
//!
//! ### なぜこのテストが必要か
//! - ビジネスロジックの検証：クライアント申告値を無条件に信用しない
//! - 完走状態が同一レース内で巻き戻らないことを保証
//! - 全員完走の検知が早期終了のトリガーとして機能することを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：レース中の進捗報告とブロードキャスト
//! - 異常系：レース開始前の報告、非メンバーの報告、過大な typedText

use std::sync::Arc;

use sokudo_shared::time::Clock;

use crate::domain::{
    MessagePusher, PlayerId, PlayerRepository, ProgressSnapshot, RoomRepository, Timestamp,
};

use super::error::CommandError;

/// typedText の受け入れ上限（バイト）
///
/// サーバーはタイプ内容を文字単位で再検証しない（クライアント側の入力制御の
/// 責務）が、無制限の入力をそのままメモリに受けることもしない。
const MAX_TYPED_TEXT_BYTES: usize = 10 * 1024;

/// 進捗反映のユースケース
pub struct UpdateProgressUseCase {
    /// Room Repository（データアクセス層の抽象化）
    room_repository: Arc<dyn RoomRepository>,
    /// Player Registry（接続 → ルームの索引）
    player_repository: Arc<dyn PlayerRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// Clock（時刻取得の抽象化）
    clock: Arc<dyn Clock>,
}

impl UpdateProgressUseCase {
    /// 新しい UpdateProgressUseCase を作成
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

    /// 進捗反映を実行
    ///
    /// 申告された数値はクランプしてから反映する（progress は [0, 100]、
    /// wpm は 0 以上）。反映後のスナップショットを返し、全員完走なら
    /// `all_finished` が true になる（呼び出し側が終了処理を起動する）。
    pub async fn execute(
        &self,
        player_id: PlayerId,
        typed_text: &str,
        reported_wpm: i64,
        reported_progress: i64,
    ) -> Result<ProgressSnapshot, CommandError> {
        // 1. typedText の長さだけ検査する（内容の再検証はしない）
        if typed_text.len() > MAX_TYPED_TEXT_BYTES {
            return Err(CommandError::Validation(
                "typed text exceeds the size limit".to_string(),
            ));
        }

        // 2. 報告者の所属ルームを解決
        let code = self
            .player_repository
            .room_of(player_id)
            .await
            .ok_or(CommandError::NotInRoom)?;

        // 3. 進捗を反映（クランプ・完走ラッチは Room エンティティが行う）
        let now = Timestamp::new(self.clock.now_millis());
        let snapshot = self
            .room_repository
            .apply_progress(&code, player_id, reported_wpm, reported_progress, now)
            .await?;

        Ok(snapshot)
    }

    /// 全メンバーに進捗スナップショットをブロードキャスト
    ///
    /// 全プレイヤーの状態を毎回配ることで、各クライアントは自分の差分だけ
    /// でなく常にルーム全体の一貫した順位表を描画できる。
    pub async fn broadcast_progress(
        &self,
        snapshot: &ProgressSnapshot,
        message: &str,
    ) -> Result<(), String> {
        let targets: Vec<PlayerId> = snapshot.players.iter().map(|p| p.id).collect();
        self.message_pusher
            .broadcast(targets, message)
            .await
            .map_err(|e| e.to_string())
    }
}
