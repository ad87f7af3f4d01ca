//! UseCase 層のエラー型定義
//!
//! クライアントに `error` イベントとして返すエラーの分類。すべて回復可能で、
//! 要求元の接続にのみ通知され、ルームや他のプレイヤーには影響しない。

use thiserror::Error;

use crate::domain::{RepositoryError, RoomError, ValueError};

/// コマンド処理のエラー
///
/// Display 実装の文字列がそのまま `error` イベントの message になる。
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// 指定されたコードのルームが存在しない
    #[error("room not found")]
    RoomNotFound,

    /// 現在のフェーズでは実行できない操作
    #[error("{0}")]
    InvalidState(String),

    /// オーナー専用の操作をオーナー以外が要求した
    #[error("only the room owner can do that")]
    Unauthorized,

    /// レース開始に必要な人数に満たない
    #[error("at least {0} players are required to start the game")]
    InsufficientPlayers(usize),

    /// ルームに所属していない
    #[error("you are not in a room")]
    NotInRoom,

    /// 入力の欠落・形式不正
    #[error("{0}")]
    Validation(String),

    /// サーバー内部のエラー（コード空間の枯渇など）
    #[error("internal server error: {0}")]
    Internal(String),
}

impl From<ValueError> for CommandError {
    fn from(e: ValueError) -> Self {
        CommandError::Validation(e.to_string())
    }
}

impl From<RoomError> for CommandError {
    fn from(e: RoomError) -> Self {
        match e {
            RoomError::NotOwner => CommandError::Unauthorized,
            RoomError::InsufficientPlayers(n) => CommandError::InsufficientPlayers(n),
            RoomError::NotInRoom => CommandError::NotInRoom,
            RoomError::RaceInProgress | RoomError::RaceNotStarted => {
                CommandError::InvalidState(e.to_string())
            }
        }
    }
}

impl From<RepositoryError> for CommandError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::RoomNotFound(_) => CommandError::RoomNotFound,
            RepositoryError::CodeSpaceExhausted(_) => CommandError::Internal(e.to_string()),
            RepositoryError::Room(room_error) => room_error.into(),
        }
    }
}
