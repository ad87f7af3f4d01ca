//! メッセージ送信（通知）のインターフェース定義
//!
//! UseCase 層はこの trait に依存し、WebSocket などの具体的な送信手段には
//! 依存しない。実装は Infrastructure 層が提供します。

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

#[cfg(test)]
use mockall::automock;

use super::value_object::PlayerId;

/// クライアントへの送信チャンネル
///
/// 接続ごとに 1 本。同一チャンネルへの送信順序は保持される。
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// メッセージ送信のエラー
#[derive(Debug, Error)]
pub enum MessagePushError {
    /// 送信先のクライアントが登録されていない
    #[error("client '{0}' not found")]
    ClientNotFound(String),

    /// 送信に失敗した（チャンネルが閉じているなど）
    #[error("failed to push message: {0}")]
    PushFailed(String),
}

/// MessagePusher trait
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// クライアントの送信チャンネルを登録
    async fn register_client(&self, player_id: PlayerId, sender: PusherChannel);

    /// クライアントの送信チャンネルを登録解除
    async fn unregister_client(&self, player_id: &PlayerId);

    /// 特定のクライアントにメッセージを送信
    async fn push_to(&self, player_id: &PlayerId, content: &str) -> Result<(), MessagePushError>;

    /// 複数のクライアントにメッセージをブロードキャスト
    ///
    /// 一部の送信失敗は許容する（切断直後のクライアントなど）。
    async fn broadcast(
        &self,
        targets: Vec<PlayerId>,
        content: &str,
    ) -> Result<(), MessagePushError>;
}
