//! InMemory Player Registry 実装
//!
//! 接続（プレイヤー ID）から所属ルームコードへのルーティング索引。
//! プレイヤーは createRoom / joinRoom で登録され、退出・切断で削除される。

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{PlayerId, PlayerRepository, RoomCode};

/// インメモリ Player Registry 実装
pub struct InMemoryPlayerRepository {
    /// プレイヤー ID → 所属ルームコード
    players: Arc<Mutex<HashMap<PlayerId, RoomCode>>>,
}

impl InMemoryPlayerRepository {
    /// 新しい InMemoryPlayerRepository を作成
    pub fn new() -> Self {
        Self {
            players: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryPlayerRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlayerRepository for InMemoryPlayerRepository {
    async fn register(&self, player_id: PlayerId, code: RoomCode) {
        let mut players = self.players.lock().await;
        players.insert(player_id, code);
    }

    async fn unregister(&self, player_id: PlayerId) -> Option<RoomCode> {
        let mut players = self.players.lock().await;
        players.remove(&player_id)
    }

    async fn room_of(&self, player_id: PlayerId) -> Option<RoomCode> {
        let players = self.players.lock().await;
        players.get(&player_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_code(code: &str) -> RoomCode {
        RoomCode::new(code.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_register_and_resolve() {
        // テスト項目: 登録したプレイヤーの所属ルームを引ける
        // given (前提条件):
        let repo = InMemoryPlayerRepository::new();
        let player_id = PlayerId::generate();

        // when (操作):
        repo.register(player_id, test_code("AB3XYZ")).await;

        // then (期待する結果):
        assert_eq!(repo.room_of(player_id).await, Some(test_code("AB3XYZ")));
    }

    #[tokio::test]
    async fn test_unregister_returns_previous_room() {
        // テスト項目: 登録解除で所属していたルームコードが返る
        // given (前提条件):
        let repo = InMemoryPlayerRepository::new();
        let player_id = PlayerId::generate();
        repo.register(player_id, test_code("AB3XYZ")).await;

        // when (操作):
        let removed = repo.unregister(player_id).await;

        // then (期待する結果):
        assert_eq!(removed, Some(test_code("AB3XYZ")));
        assert_eq!(repo.room_of(player_id).await, None);
    }

    #[tokio::test]
    async fn test_unregister_unknown_player_returns_none() {
        // テスト項目: 未登録プレイヤーの登録解除が None になる（冪等性）
        // given (前提条件):
        let repo = InMemoryPlayerRepository::new();

        // when (操作):
        let removed = repo.unregister(PlayerId::generate()).await;

        // then (期待する結果):
        assert_eq!(removed, None);
    }

    #[tokio::test]
    async fn test_register_overwrites_previous_room() {
        // テスト項目: 再登録で所属ルームが上書きされる
        // given (前提条件):
        let repo = InMemoryPlayerRepository::new();
        let player_id = PlayerId::generate();
        repo.register(player_id, test_code("AB3XYZ")).await;

        // when (操作):
        repo.register(player_id, test_code("CD5PQR")).await;

        // then (期待する結果):
        assert_eq!(repo.room_of(player_id).await, Some(test_code("CD5PQR")));
    }
}
