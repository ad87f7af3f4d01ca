//! 最終順位の計算
//!
//! レース終了時のプレイヤー集合から決定的な順位を計算します。

use std::cmp::Ordering;

use super::entity::Player;

/// レース終了時の順位を計算する
///
/// 順位のルール:
/// 1. 完走したプレイヤーが未完走のプレイヤーより上位
/// 2. 完走者同士は `finish_time` の昇順（先に完走した方が上位）
/// 3. 未完走者同士は `progress` の降順、同値なら `wpm` の降順
///
/// 安定ソートなので、すべてのキーが等しいプレイヤーは参加順を維持する。
pub fn rank_players(players: &[Player]) -> Vec<Player> {
    let mut ranked = players.to_vec();
    ranked.sort_by(|a, b| match (a.is_finished, b.is_finished) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (true, true) => a.finish_time.cmp(&b.finish_time),
        (false, false) => b.progress.cmp(&a.progress).then(b.wpm.cmp(&a.wpm)),
    });
    ranked
}
