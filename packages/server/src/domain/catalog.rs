//! レーステキストのカタログのインターフェース定義

#[cfg(test)]
use mockall::automock;

/// TextCatalog trait
///
/// レースで使う段落の読み取り専用コレクション。
/// 実装は候補から一様ランダムに 1 つ選んで返す。
#[cfg_attr(test, automock)]
pub trait TextCatalog: Send + Sync {
    /// レース用の段落を 1 つ選ぶ
    fn pick_paragraph(&self) -> String;
}
