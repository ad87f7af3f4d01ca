//! WebSocket メッセージの DTO 定義
//!
//! ワイヤフォーマットは両方向とも `{"type": ..., "payload": {...}}` の
//! JSON オブジェクト。方向ごとに閉じたタグ付き enum としてモデル化し、
//! ペイロードの形はコンポーネントに入る前に境界で検証される。

use serde::{Deserialize, Serialize};

/// クライアント → サーバーのメッセージ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum ClientMessage {
    /// ルーム作成要求
    #[serde(rename_all = "camelCase")]
    CreateRoom {
        room_name: String,
        is_private: bool,
        player_name: String,
    },
    /// ルーム参加要求（コードは大文字小文字を区別しない）
    #[serde(rename_all = "camelCase")]
    JoinRoom {
        room_code: String,
        player_name: String,
    },
    /// レース開始要求（オーナーのみ）
    StartGame {},
    /// 進捗報告
    #[serde(rename_all = "camelCase")]
    UpdateProgress {
        typed_text: String,
        wpm: i64,
        progress: i64,
    },
    /// ルーム退出要求
    LeaveRoom {},
}

/// サーバー → クライアントのメッセージ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum ServerMessage {
    /// ルーム作成の応答（要求者のみ）
    #[serde(rename_all = "camelCase")]
    RoomCreated { room: RoomDto, player_id: String },
    /// ルーム参加の応答（要求者のみ）
    #[serde(rename_all = "camelCase")]
    RoomJoined { room: RoomDto, player_id: String },
    /// 新規参加の通知（既存メンバー宛）
    PlayerJoined { room: RoomDto },
    /// 退出の通知（残存メンバー宛）
    PlayerLeft { room: RoomDto },
    /// レース開始の通知（全メンバー宛、全員が同一の text / startTime を受け取る）
    #[serde(rename_all = "camelCase")]
    GameStarted { text: String, start_time: i64 },
    /// 進捗スナップショットの通知（全メンバー宛）
    ProgressUpdate { players: Vec<PlayerDto> },
    /// レース終了と最終順位の通知（全メンバー宛）
    GameEnded { rankings: Vec<PlayerDto> },
    /// ルーム破棄の通知
    RoomDestroyed { message: String },
    /// エラー通知（要求者のみ）
    Error { message: String },
}

/// プレイヤーのライブ状態
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDto {
    pub id: String,
    pub name: String,
    pub is_owner: bool,
    pub wpm: u32,
    pub progress: u8,
    pub is_finished: bool,
}

/// ルームのスナップショット
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDto {
    pub code: String,
    pub name: String,
    pub is_private: bool,
    pub owner_id: String,
    pub players: Vec<PlayerDto>,
    pub game_state: String,
    pub current_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_start_time: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_create_room_deserializes() {
        // テスト項目: createRoom メッセージが {type, payload} 形式からパースできる
        // given (前提条件):
        let json = r#"{"type":"createRoom","payload":{"roomName":"My Room","isPrivate":true,"playerName":"alice"}}"#;

        // when (操作):
        let message: ClientMessage = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert_eq!(
            message,
            ClientMessage::CreateRoom {
                room_name: "My Room".to_string(),
                is_private: true,
                player_name: "alice".to_string(),
            }
        );
    }

    #[test]
    fn test_client_message_update_progress_deserializes() {
        // テスト項目: updateProgress メッセージのフィールドが camelCase で対応する
        // given (前提条件):
        let json = r#"{"type":"updateProgress","payload":{"typedText":"the quick","wpm":42,"progress":37}}"#;

        // when (操作):
        let message: ClientMessage = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert_eq!(
            message,
            ClientMessage::UpdateProgress {
                typed_text: "the quick".to_string(),
                wpm: 42,
                progress: 37,
            }
        );
    }

    #[test]
    fn test_client_message_without_payload_fields() {
        // テスト項目: startGame / leaveRoom が空ペイロードでパースできる
        // given (前提条件):
        let start = r#"{"type":"startGame","payload":{}}"#;
        let leave = r#"{"type":"leaveRoom","payload":{}}"#;

        // when (操作) / then (期待する結果):
        assert_eq!(
            serde_json::from_str::<ClientMessage>(start).unwrap(),
            ClientMessage::StartGame {}
        );
        assert_eq!(
            serde_json::from_str::<ClientMessage>(leave).unwrap(),
            ClientMessage::LeaveRoom {}
        );
    }

    #[test]
    fn test_unknown_message_type_is_rejected() {
        // テスト項目: 未知の type がパースエラーになる（閉じたタグ付き union）
        // given (前提条件):
        let json = r#"{"type":"hackTheRoom","payload":{}}"#;

        // when (操作):
        let result = serde_json::from_str::<ClientMessage>(json);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_server_message_game_started_serializes() {
        // テスト項目: gameStarted が {type, payload} 形式で camelCase になる
        // given (前提条件):
        let message = ServerMessage::GameStarted {
            text: "race text".to_string(),
            start_time: 1700000000000,
        };

        // when (操作):
        let json = serde_json::to_string(&message).unwrap();

        // then (期待する結果):
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "gameStarted");
        assert_eq!(value["payload"]["text"], "race text");
        assert_eq!(value["payload"]["startTime"], 1700000000000i64);
    }

    #[test]
    fn test_server_message_error_serializes() {
        // テスト項目: error イベントが message フィールドを持つ
        // given (前提条件):
        let message = ServerMessage::Error {
            message: "room not found".to_string(),
        };

        // when (操作):
        let json = serde_json::to_string(&message).unwrap();

        // then (期待する結果):
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "error");
        assert_eq!(value["payload"]["message"], "room not found");
    }

    #[test]
    fn test_room_dto_waiting_room_omits_start_time() {
        // テスト項目: 開始前のルームでは gameStartTime が出力されない
        // given (前提条件):
        let room = RoomDto {
            code: "AB3XYZ".to_string(),
            name: "My Room".to_string(),
            is_private: false,
            owner_id: "owner-id".to_string(),
            players: vec![],
            game_state: "waiting".to_string(),
            current_text: String::new(),
            game_start_time: None,
        };

        // when (操作):
        let json = serde_json::to_string(&room).unwrap();

        // then (期待する結果):
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["gameState"], "waiting");
        assert!(value.get("gameStartTime").is_none());
    }
}
