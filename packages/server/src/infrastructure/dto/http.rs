//! HTTP API レスポンスの DTO 定義

use serde::{Deserialize, Serialize};

/// デバッグ用のルームサマリ
///
/// ルーム一覧の公開 API ではなく、オペレーター向けのデバッグ表現。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    pub code: String,
    pub name: String,
    pub is_private: bool,
    pub player_count: usize,
    pub game_state: String,
}
