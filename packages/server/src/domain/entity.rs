//! Entities
//!
//! ルームのメンバーとチャットメッセージ。

use serde::Serialize;

use super::{ConnectionId, DisplayName, Timestamp};

/// ルームのメンバー（接続 ID と表示名の組）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    pub connection_id: ConnectionId,
    pub display_name: DisplayName,
}

impl Member {
    pub fn new(connection_id: ConnectionId, display_name: DisplayName) -> Self {
        Self {
            connection_id,
            display_name,
        }
    }
}

/// チャットメッセージ
///
/// 追加後は変更されない。順序は追加順のみで保証される。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub display_name: DisplayName,
    pub body: String,
    pub sent_at: Timestamp,
}

impl ChatMessage {
    pub fn new(display_name: DisplayName, body: String, sent_at: Timestamp) -> Self {
        Self {
            display_name,
            body,
            sent_at,
        }
    }
}
