//! 組み込みのレーステキストカタログ
//!
//! 読み取り専用の段落コレクション。レース開始のたびに一様ランダムに
//! 1 つ選んで返す。

use rand::seq::SliceRandom;

use crate::domain::TextCatalog;

/// 組み込みの段落一覧
const SAMPLE_PARAGRAPHS: [&str; 5] = [
    "The quick brown fox jumps over the lazy dog while the sun sets behind the mountains. \
     Birds chirp melodiously as evening approaches, creating a peaceful atmosphere that calms \
     the mind and soothes the soul.",
    "Technology has revolutionized the way we communicate and interact with each other. From \
     smartphones to social media platforms, digital innovation continues to shape our daily \
     lives in unprecedented ways.",
    "Reading books expands our knowledge and imagination while improving our vocabulary and \
     critical thinking skills. Literature transports us to different worlds and helps us \
     understand diverse perspectives and cultures.",
    "Cooking is both an art and a science that brings people together around shared meals. \
     The combination of fresh ingredients, proper techniques, and creativity results in \
     delicious dishes that nourish body and soul.",
    "Exercise and physical activity are essential for maintaining good health and mental \
     wellbeing. Regular movement strengthens muscles, improves cardiovascular function, and \
     releases endorphins that boost mood and energy levels.",
];

/// 静的な TextCatalog 実装
pub struct StaticTextCatalog {
    paragraphs: Vec<String>,
}

impl StaticTextCatalog {
    /// 組み込みの段落でカタログを作成
    pub fn new() -> Self {
        Self {
            paragraphs: SAMPLE_PARAGRAPHS.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// 任意の段落でカタログを作成（テスト用）
    pub fn with_paragraphs(paragraphs: Vec<String>) -> Self {
        Self { paragraphs }
    }
}

impl Default for StaticTextCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl TextCatalog for StaticTextCatalog {
    fn pick_paragraph(&self) -> String {
        self.paragraphs
            .choose(&mut rand::thread_rng())
            .cloned()
            .unwrap_or_default()
    }
}
