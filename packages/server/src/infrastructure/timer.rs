//! レース期限タイマー
//!
//! ルームごとのレース期限をキャンセル可能な tokio タスクとして管理する。
//! タイマーはルームのライフサイクルに紐付き、レースがタイムアウト以外の
//! 経路（全員完走・ルーム破棄）で終わるときは必ずキャンセルされる。
//! 破棄済みルームに対して古いタイマーが発火しても、終了処理側が
//! no-op にするため二重の終了イベントは発生しない。

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::domain::RoomCode;

/// ルームごとのレース期限タイマー
pub struct RaceScheduler {
    /// ルームコード → 実行待ちの期限タスク
    deadlines: Mutex<HashMap<RoomCode, JoinHandle<()>>>,
}

impl RaceScheduler {
    /// 新しい RaceScheduler を作成
    pub fn new() -> Self {
        Self {
            deadlines: Mutex::new(HashMap::new()),
        }
    }

    /// ルームの期限タスクを登録する
    ///
    /// `delay` 経過後に `on_deadline` を実行するタスクを生成する。
    /// 同じルームに既存のタイマーがある場合は置き換える（旧タイマーは
    /// 中断される）。
    pub async fn schedule<F>(&self, code: RoomCode, delay: Duration, on_deadline: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            on_deadline.await;
        });

        let mut deadlines = self.deadlines.lock().await;
        if let Some(previous) = deadlines.insert(code, handle) {
            previous.abort();
        }
    }

    /// ルームの期限タスクをキャンセルする
    ///
    /// タスクが既に発火・完了していても安全に呼べる（冪等）。
    pub async fn cancel(&self, code: &RoomCode) {
        let mut deadlines = self.deadlines.lock().await;
        if let Some(handle) = deadlines.remove(code) {
            handle.abort();
            tracing::debug!("Race deadline for room '{}' cancelled", code.as_str());
        }
    }

    /// すべての期限タスクをキャンセルする（シャットダウン用）
    pub async fn cancel_all(&self) {
        let mut deadlines = self.deadlines.lock().await;
        for (_, handle) in deadlines.drain() {
            handle.abort();
        }
    }

    /// ルームの期限タスクが登録されているか
    pub async fn is_scheduled(&self, code: &RoomCode) -> bool {
        let deadlines = self.deadlines.lock().await;
        deadlines.contains_key(code)
    }
}

impl Default for RaceScheduler {
    fn default() -> Self {
        Self::new()
    }
}
