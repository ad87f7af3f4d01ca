//! ドメイン層のエラー型定義

use thiserror::Error;

/// 値オブジェクトの検証エラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// ルームコードの形式が不正
    #[error("room code must be 6 alphanumeric characters")]
    InvalidRoomCode,

    /// ルーム名が空、または長すぎる
    #[error("room name must be 1-64 characters")]
    InvalidRoomName,

    /// プレイヤー名が空、または長すぎる
    #[error("player name must be 1-64 characters")]
    InvalidPlayerName,
}

/// Room エンティティの状態遷移エラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoomError {
    /// レース中は参加・開始できない
    #[error("the game is already in progress")]
    RaceInProgress,

    /// オーナー以外はレースを開始できない
    #[error("only the room owner can start the game")]
    NotOwner,

    /// レース開始に必要な人数に満たない
    #[error("at least {0} players are required to start the game")]
    InsufficientPlayers(usize),

    /// プレイヤーがルームのメンバーではない
    #[error("player is not a member of this room")]
    NotInRoom,

    /// レースが開始されていない
    #[error("the game is not in progress")]
    RaceNotStarted,
}

/// Repository 操作のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// 指定されたコードのルームが存在しない
    #[error("room '{0}' not found")]
    RoomNotFound(String),

    /// ルームコードの衝突が解消できない
    #[error("failed to allocate a unique room code after {0} attempts")]
    CodeSpaceExhausted(u32),

    /// ドメインモデルの状態遷移エラー
    #[error(transparent)]
    Room(#[from] RoomError),
}
