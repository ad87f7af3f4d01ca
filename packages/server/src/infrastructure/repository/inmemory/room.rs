//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//!
//! ## 同時実行モデル
//!
//! ルームは `RoomCode → Arc<Mutex<Room>>` の二段構成で保持します。
//! 外側のマップロックはルームの登録・破棄・検索の間だけ保持し、
//! 個々のルームの状態変更はそのルーム専用のロックの下で行うため、
//! 異なるルームへの操作は並行に進みます。同一ルームへの操作は
//! ルームロックで直列化され、各操作はアトミックに適用されます。
//!
//! ロック順序は常に「マップ → ルーム」。ルームロックを保持したまま
//! マップロックを取ることはありません。

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    Player, PlayerId, ProgressSnapshot, RemovalOutcome, RemovedPlayer, RepositoryError, Room,
    RoomCode, RoomCodeFactory, RoomName, RoomRepository, Timestamp,
};

/// コード発番を諦めるまでの連続衝突回数
///
/// 32 文字 ^ 6 桁のコード空間に対してライブなルームは高々数千のオーダー
/// なので、実際に到達することはまずない。
const MAX_CODE_ATTEMPTS: u32 = 32;

/// インメモリ Room Repository 実装
pub struct InMemoryRoomRepository {
    /// ライブなルーム群
    rooms: Arc<Mutex<HashMap<RoomCode, Arc<Mutex<Room>>>>>,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    pub fn new() -> Self {
        Self {
            rooms: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// ルームのロックハンドルを取得（マップロックは取得後すぐ手放す）
    async fn room_handle(&self, code: &RoomCode) -> Result<Arc<Mutex<Room>>, RepositoryError> {
        let rooms = self.rooms.lock().await;
        rooms
            .get(code)
            .cloned()
            .ok_or_else(|| RepositoryError::RoomNotFound(code.as_str().to_string()))
    }
}

impl Default for InMemoryRoomRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn create_room(
        &self,
        name: RoomName,
        is_private: bool,
        owner: Player,
        created_at: Timestamp,
    ) -> Result<Room, RepositoryError> {
        // 発番と登録をマップロックの下でアトミックに行う（衝突時は再生成）
        let mut rooms = self.rooms.lock().await;
        let mut attempts = 0;
        let code = loop {
            let candidate = RoomCodeFactory::generate();
            if !rooms.contains_key(&candidate) {
                break candidate;
            }
            attempts += 1;
            if attempts >= MAX_CODE_ATTEMPTS {
                return Err(RepositoryError::CodeSpaceExhausted(MAX_CODE_ATTEMPTS));
            }
        };

        let room = Room::new(code.clone(), name, is_private, owner, created_at);
        rooms.insert(code, Arc::new(Mutex::new(room.clone())));
        tracing::info!("Room '{}' created", room.code.as_str());
        Ok(room)
    }

    async fn get_room(&self, code: &RoomCode) -> Result<Room, RepositoryError> {
        let handle = self.room_handle(code).await?;
        let room = handle.lock().await;
        Ok(room.clone())
    }

    async fn add_player(
        &self,
        code: &RoomCode,
        player: Player,
    ) -> Result<Room, RepositoryError> {
        let handle = self.room_handle(code).await?;
        let mut room = handle.lock().await;
        room.add_player(player)?;
        Ok(room.clone())
    }

    async fn remove_player(
        &self,
        code: &RoomCode,
        player_id: PlayerId,
    ) -> Result<RemovedPlayer, RepositoryError> {
        // 破棄の可能性があるのでマップロックを保持したままルームを操作する
        let mut rooms = self.rooms.lock().await;
        let handle = rooms
            .get(code)
            .cloned()
            .ok_or_else(|| RepositoryError::RoomNotFound(code.as_str().to_string()))?;
        let mut room = handle.lock().await;

        match room.remove_player(player_id)? {
            RemovalOutcome::Empty => {
                drop(room);
                rooms.remove(code);
                tracing::info!("Room '{}' destroyed (last player left)", code.as_str());
                Ok(RemovedPlayer {
                    room: None,
                    reassigned_owner: None,
                })
            }
            RemovalOutcome::Remaining { new_owner } => {
                if let Some(owner_id) = new_owner {
                    tracing::info!(
                        "Room '{}' ownership reassigned to '{}'",
                        code.as_str(),
                        owner_id
                    );
                }
                Ok(RemovedPlayer {
                    room: Some(room.clone()),
                    reassigned_owner: new_owner,
                })
            }
        }
    }

    async fn start_race(
        &self,
        code: &RoomCode,
        requester: PlayerId,
        text: String,
        now: Timestamp,
    ) -> Result<Room, RepositoryError> {
        let handle = self.room_handle(code).await?;
        let mut room = handle.lock().await;
        room.start_race(requester, text, now)?;
        Ok(room.clone())
    }

    async fn apply_progress(
        &self,
        code: &RoomCode,
        player_id: PlayerId,
        reported_wpm: i64,
        reported_progress: i64,
        now: Timestamp,
    ) -> Result<ProgressSnapshot, RepositoryError> {
        let handle = self.room_handle(code).await?;
        let mut room = handle.lock().await;
        room.apply_progress(player_id, reported_wpm, reported_progress, now)?;
        Ok(ProgressSnapshot {
            room_code: room.code.clone(),
            players: room.players.clone(),
            all_finished: room.all_finished(),
        })
    }

    async fn finish_race(&self, code: &RoomCode) -> Result<Room, RepositoryError> {
        let handle = self.room_handle(code).await?;
        let mut room = handle.lock().await;
        room.finish_race()?;
        Ok(room.clone())
    }

    async fn list_rooms(&self) -> Vec<Room> {
        let handles: Vec<Arc<Mutex<Room>>> = {
            let rooms = self.rooms.lock().await;
            rooms.values().cloned().collect()
        };
        let mut snapshots = Vec::with_capacity(handles.len());
        for handle in handles {
            snapshots.push(handle.lock().await.clone());
        }
        snapshots
    }
}
