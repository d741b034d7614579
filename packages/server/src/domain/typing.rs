//! タイピング状態の管理
//!
//! 接続ごとに世代番号を持ち、最新の世代の期限切れだけを有効とする。
//! タイマー自体は Infrastructure 層（ルームアクター）が管理する。

use std::collections::HashMap;

use super::{ConnectionId, DisplayName};

#[derive(Debug, Clone)]
struct TypingEntry {
    display_name: DisplayName,
    generation: u64,
}

/// タイピング中の接続の集合
#[derive(Debug, Default)]
pub struct TypingTracker {
    entries: HashMap<ConnectionId, TypingEntry>,
    next_generation: u64,
}

impl TypingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// タイピング開始を記録し、新しい世代番号を返す
    ///
    /// 既存の記録は上書きされ、古い世代の期限切れは無視されるようになる。
    pub fn start(&mut self, connection_id: ConnectionId, display_name: DisplayName) -> u64 {
        self.next_generation += 1;
        let generation = self.next_generation;
        self.entries.insert(
            connection_id,
            TypingEntry {
                display_name,
                generation,
            },
        );
        generation
    }

    /// 期限切れを処理する
    ///
    /// 世代番号が最新の場合のみ記録を削除し、表示名を返す。
    pub fn expire(&mut self, connection_id: &ConnectionId, generation: u64) -> Option<DisplayName> {
        match self.entries.get(connection_id) {
            Some(entry) if entry.generation == generation => self
                .entries
                .remove(connection_id)
                .map(|entry| entry.display_name),
            _ => None,
        }
    }

    /// 記録を取り消す（退出時）
    pub fn cancel(&mut self, connection_id: &ConnectionId) -> Option<DisplayName> {
        self.entries
            .remove(connection_id)
            .map(|entry| entry.display_name)
    }

    #[cfg(test)]
    pub fn is_typing(&self, connection_id: &ConnectionId) -> bool {
        self.entries.contains_key(connection_id)
    }
}
