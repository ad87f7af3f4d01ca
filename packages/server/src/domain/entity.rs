//! ドメインエンティティ定義
//!
//! `Room` はレースの状態機械そのものです。参加・退出・開始・進捗反映・終了の
//! すべての状態遷移はこのモジュールのメソッドを経由し、他の層が
//! フィールドを直接書き換えることはありません。

use std::time::Duration;

use super::error::RoomError;
use super::value_object::{GamePhase, PlayerId, PlayerName, RoomCode, RoomName, Timestamp};

/// レース開始に必要な最低人数
pub const MIN_PLAYERS_TO_START: usize = 2;

/// レースの制限時間（ゲーム開始時刻から固定 60 秒）
pub const RACE_DURATION: Duration = Duration::from_secs(60);

/// ルームに参加しているプレイヤー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub name: PlayerName,
    /// ルームオーナーかどうか（1 ルームにつき常に 1 人だけ true）
    pub is_owner: bool,
    /// クライアント申告の words-per-minute（クランプ済み）
    pub wpm: u32,
    /// レーステキストの入力済み割合 [0, 100]
    pub progress: u8,
    /// progress が 100 に到達したか（次のレースまでラッチされる）
    pub is_finished: bool,
    /// is_finished が true になった瞬間の時刻
    pub finish_time: Option<Timestamp>,
    /// ルームに参加した時刻（オーナー引き継ぎの優先順位に使う）
    pub joined_at: Timestamp,
}

impl Player {
    pub fn new(id: PlayerId, name: PlayerName, joined_at: Timestamp) -> Self {
        Self {
            id,
            name,
            is_owner: false,
            wpm: 0,
            progress: 0,
            is_finished: false,
            finish_time: None,
            joined_at,
        }
    }

    /// レース開始時に進捗関連の状態をリセット
    fn reset_for_race(&mut self) {
        self.wpm = 0;
        self.progress = 0;
        self.is_finished = false;
        self.finish_time = None;
    }
}

/// プレイヤー退出の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalOutcome {
    /// 他のプレイヤーが残っている（オーナーが抜けた場合は引き継ぎ先を含む）
    Remaining { new_owner: Option<PlayerId> },
    /// 最後のプレイヤーが退出した（ルームは破棄されるべき）
    Empty,
}

/// レースルーム
///
/// `players` は参加順を保持する（表示順 = 参加順）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub code: RoomCode,
    pub name: RoomName,
    pub is_private: bool,
    pub owner_id: PlayerId,
    pub players: Vec<Player>,
    pub phase: GamePhase,
    /// 進行中（または直近）のレースで使うテキスト。待機中は空文字列。
    pub current_text: String,
    /// レース開始時刻。全クライアントがこの値から経過時間を計算する。
    pub game_start_time: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl Room {
    /// オーナーを最初のメンバーとして新しいルームを作成
    pub fn new(
        code: RoomCode,
        name: RoomName,
        is_private: bool,
        mut owner: Player,
        created_at: Timestamp,
    ) -> Self {
        owner.is_owner = true;
        let owner_id = owner.id;
        Self {
            code,
            name,
            is_private,
            owner_id,
            players: vec![owner],
            phase: GamePhase::Waiting,
            current_text: String::new(),
            game_start_time: None,
            created_at,
        }
    }

    /// プレイヤーを参加順の末尾に追加
    ///
    /// レース進行中の途中参加は許可しない。
    pub fn add_player(&mut self, player: Player) -> Result<(), RoomError> {
        if self.phase == GamePhase::Playing {
            return Err(RoomError::RaceInProgress);
        }
        self.players.push(player);
        Ok(())
    }

    /// プレイヤーを退出させる
    ///
    /// 退出したのがオーナーで他のプレイヤーが残っている場合、参加時刻が
    /// 最も早い（同時刻なら参加順が先の）プレイヤーにオーナーを引き継ぐ。
    pub fn remove_player(&mut self, player_id: PlayerId) -> Result<RemovalOutcome, RoomError> {
        let index = self
            .players
            .iter()
            .position(|p| p.id == player_id)
            .ok_or(RoomError::NotInRoom)?;
        let removed = self.players.remove(index);

        if self.players.is_empty() {
            return Ok(RemovalOutcome::Empty);
        }

        let mut new_owner = None;
        if removed.is_owner {
            let mut successor = 0;
            for (i, p) in self.players.iter().enumerate().skip(1) {
                if p.joined_at < self.players[successor].joined_at {
                    successor = i;
                }
            }
            self.players[successor].is_owner = true;
            self.owner_id = self.players[successor].id;
            new_owner = Some(self.owner_id);
        }

        Ok(RemovalOutcome::Remaining { new_owner })
    }

    /// レースを開始する
    ///
    /// `Waiting` と `Finished`（再戦）から開始でき、`Playing` 中のみ拒否する。
    /// 成功時は全プレイヤーの進捗状態をリセットする。
    pub fn start_race(
        &mut self,
        requester: PlayerId,
        text: String,
        now: Timestamp,
    ) -> Result<(), RoomError> {
        if requester != self.owner_id {
            return Err(RoomError::NotOwner);
        }
        if self.players.len() < MIN_PLAYERS_TO_START {
            return Err(RoomError::InsufficientPlayers(MIN_PLAYERS_TO_START));
        }
        if self.phase == GamePhase::Playing {
            return Err(RoomError::RaceInProgress);
        }

        self.current_text = text;
        self.game_start_time = Some(now);
        self.phase = GamePhase::Playing;
        for player in &mut self.players {
            player.reset_for_race();
        }
        Ok(())
    }

    /// クライアント申告の進捗を反映する
    ///
    /// 数値はクランプしてから信用する（progress は [0, 100]、wpm は 0 以上）。
    /// 一度 `is_finished` になったプレイヤーの完走状態は同一レース内では
    /// 取り消せない（wpm のみ更新を受け付ける）。
    pub fn apply_progress(
        &mut self,
        player_id: PlayerId,
        reported_wpm: i64,
        reported_progress: i64,
        now: Timestamp,
    ) -> Result<(), RoomError> {
        if self.phase != GamePhase::Playing {
            return Err(RoomError::RaceNotStarted);
        }
        let player = self
            .players
            .iter_mut()
            .find(|p| p.id == player_id)
            .ok_or(RoomError::NotInRoom)?;

        let wpm = reported_wpm.clamp(0, i64::from(u32::MAX)) as u32;
        player.wpm = wpm;

        if player.is_finished {
            return Ok(());
        }

        let progress = reported_progress.clamp(0, 100) as u8;
        player.progress = progress;
        if progress >= 100 {
            player.is_finished = true;
            player.finish_time = Some(now);
        }
        Ok(())
    }

    /// 全プレイヤーが完走したか（レース進行中のみ true になり得る）
    pub fn all_finished(&self) -> bool {
        self.phase == GamePhase::Playing
            && !self.players.is_empty()
            && self.players.iter().all(|p| p.is_finished)
    }

    /// レースを終了させる
    pub fn finish_race(&mut self) -> Result<(), RoomError> {
        if self.phase != GamePhase::Playing {
            return Err(RoomError::RaceNotStarted);
        }
        self.phase = GamePhase::Finished;
        Ok(())
    }

    /// 指定プレイヤーがメンバーかどうか
    pub fn is_member(&self, player_id: PlayerId) -> bool {
        self.players.iter().any(|p| p.id == player_id)
    }

    /// 全メンバーのプレイヤー ID（ブロードキャスト対象の取得に使う）
    pub fn member_ids(&self) -> Vec<PlayerId> {
        self.players.iter().map(|p| p.id).collect()
    }
}
