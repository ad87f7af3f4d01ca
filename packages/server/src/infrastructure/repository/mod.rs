//! Repository 実装
//!
//! 現在はインメモリ実装のみ。ライブなルーム状態が唯一の正であり、
//! 永続ストアはこのコアの範囲外（必要になれば同じ trait の別実装を足す）。

pub mod inmemory;

pub use inmemory::{InMemoryPlayerRepository, InMemoryRoomRepository};
