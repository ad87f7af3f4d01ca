//! 値オブジェクト定義
//!
//! すべての値オブジェクトはコンストラクタで検証を行い、
//! 不正な値を持つインスタンスが存在しないことを保証します。

use rand::Rng;
use uuid::Uuid;

use super::error::ValueError;

/// ルームコードの文字数
pub const CODE_LENGTH: usize = 6;

/// ルームコード生成に使う文字集合
///
/// 紛らわしい文字（I, O, 0, 1）は含めない。
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// 表示名の最大文字数（ルーム名・プレイヤー名共通）
const MAX_NAME_LENGTH: usize = 64;

/// プレイヤー ID（接続ごとに発行される UUID v4）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(Uuid);

impl PlayerId {
    /// 新しいプレイヤー ID を発行
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// ルームコード（6 文字の英数字、大文字に正規化済み）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomCode(String);

impl RoomCode {
    /// 入力文字列からルームコードを作成
    ///
    /// 前後の空白を除去し、大文字に正規化した上で検証します。
    pub fn new(raw: String) -> Result<Self, ValueError> {
        let normalized = raw.trim().to_ascii_uppercase();
        if normalized.len() != CODE_LENGTH
            || !normalized.bytes().all(|b| b.is_ascii_alphanumeric())
        {
            return Err(ValueError::InvalidRoomCode);
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for RoomCode {
    type Error = ValueError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl std::fmt::Display for RoomCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// ルームコードのファクトリ
///
/// 生成されるコードの一意性は Repository 側で保証します（衝突時は再生成）。
pub struct RoomCodeFactory;

impl RoomCodeFactory {
    /// CODE_ALPHABET から一様ランダムに 6 文字のコードを生成
    pub fn generate() -> RoomCode {
        let mut rng = rand::thread_rng();
        let code: String = (0..CODE_LENGTH)
            .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
            .collect();
        RoomCode(code)
    }
}

/// ルームの表示名（前後の空白を除去済み）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomName(String);

impl RoomName {
    pub fn new(raw: String) -> Result<Self, ValueError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.chars().count() > MAX_NAME_LENGTH {
            return Err(ValueError::InvalidRoomName);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RoomName {
    type Error = ValueError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

/// プレイヤーの表示名（前後の空白を除去済み）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerName(String);

impl PlayerName {
    pub fn new(raw: String) -> Result<Self, ValueError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.chars().count() > MAX_NAME_LENGTH {
            return Err(ValueError::InvalidPlayerName);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PlayerName {
    type Error = ValueError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

/// Unix タイムスタンプ（ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// ゲームの進行フェーズ
///
/// `Waiting → Playing → Finished` の順に遷移し、レース中に巻き戻ることはない。
/// オーナーが再戦を要求した場合のみ `Finished` から次のレースへ進む。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Waiting,
    Playing,
    Finished,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Waiting => "waiting",
            GamePhase::Playing => "playing",
            GamePhase::Finished => "finished",
        }
    }
}

impl std::fmt::Display for GamePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_code_normalizes_to_uppercase() {
        // テスト項目: 小文字のルームコードが大文字に正規化される
        // given (前提条件):
        let raw = " ab3xyz ".to_string();

        // when (操作):
        let code = RoomCode::new(raw).unwrap();

        // then (期待する結果):
        assert_eq!(code.as_str(), "AB3XYZ");
    }

    #[test]
    fn test_room_code_rejects_wrong_length() {
        // テスト項目: 6 文字以外のルームコードが拒否される
        // given (前提条件):
        let too_short = "ABC12".to_string();
        let too_long = "ABC1234".to_string();

        // when (操作):
        let short_result = RoomCode::new(too_short);
        let long_result = RoomCode::new(too_long);

        // then (期待する結果):
        assert_eq!(short_result, Err(ValueError::InvalidRoomCode));
        assert_eq!(long_result, Err(ValueError::InvalidRoomCode));
    }

    #[test]
    fn test_room_code_rejects_non_alphanumeric() {
        // テスト項目: 英数字以外を含むルームコードが拒否される
        // given (前提条件):
        let raw = "AB-12!".to_string();

        // when (操作):
        let result = RoomCode::new(raw);

        // then (期待する結果):
        assert_eq!(result, Err(ValueError::InvalidRoomCode));
    }

    #[test]
    fn test_generated_room_code_is_valid() {
        // テスト項目: 生成されたルームコードが 6 文字・大文字英数字である
        // given (前提条件):

        // when (操作):
        let code = RoomCodeFactory::generate();

        // then (期待する結果):
        assert_eq!(code.as_str().len(), CODE_LENGTH);
        assert!(
            code.as_str()
                .bytes()
                .all(|b| CODE_ALPHABET.contains(&b))
        );
        // 正規化済みコードとして再パースできる
        assert!(RoomCode::new(code.as_str().to_string()).is_ok());
    }

    #[test]
    fn test_generated_room_codes_vary() {
        // テスト項目: 生成されたルームコードが毎回同じ値にならない
        // given (前提条件):
        let codes: Vec<RoomCode> = (0..32).map(|_| RoomCodeFactory::generate()).collect();

        // when (操作):
        let distinct: std::collections::HashSet<&str> =
            codes.iter().map(|c| c.as_str()).collect();

        // then (期待する結果): 32 回の生成で最低 2 種類は現れる
        assert!(distinct.len() > 1);
    }

    #[test]
    fn test_room_name_is_trimmed() {
        // テスト項目: ルーム名の前後の空白が除去される
        // given (前提条件):
        let raw = "  Friday Night Race  ".to_string();

        // when (操作):
        let name = RoomName::new(raw).unwrap();

        // then (期待する結果):
        assert_eq!(name.as_str(), "Friday Night Race");
    }

    #[test]
    fn test_room_name_rejects_empty() {
        // テスト項目: 空白のみのルーム名が拒否される
        // given (前提条件):
        let raw = "   ".to_string();

        // when (操作):
        let result = RoomName::new(raw);

        // then (期待する結果):
        assert_eq!(result, Err(ValueError::InvalidRoomName));
    }

    #[test]
    fn test_player_name_rejects_too_long() {
        // テスト項目: 64 文字を超えるプレイヤー名が拒否される
        // given (前提条件):
        let raw = "x".repeat(65);

        // when (操作):
        let result = PlayerName::new(raw);

        // then (期待する結果):
        assert_eq!(result, Err(ValueError::InvalidPlayerName));
    }

    #[test]
    fn test_player_id_is_unique() {
        // テスト項目: 発行されるプレイヤー ID が一意である
        // given (前提条件):

        // when (操作):
        let id1 = PlayerId::generate();
        let id2 = PlayerId::generate();

        // then (期待する結果):
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_game_phase_as_str() {
        // テスト項目: フェーズが wire 表現の文字列に変換される
        // given (前提条件):

        // when (操作) / then (期待する結果):
        assert_eq!(GamePhase::Waiting.as_str(), "waiting");
        assert_eq!(GamePhase::Playing.as_str(), "playing");
        assert_eq!(GamePhase::Finished.as_str(), "finished");
    }
}
