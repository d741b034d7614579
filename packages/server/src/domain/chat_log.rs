//! ルームごとのチャット履歴
//!
//! 上限件数を超えると古いメッセージから破棄される（FIFO）。

use std::collections::VecDeque;

use super::ChatMessage;

/// ルームあたりのチャット履歴の既定の上限件数
pub const DEFAULT_CHAT_LOG_CAPACITY: usize = 100;

/// 上限付きのチャット履歴
#[derive(Debug, Clone)]
pub struct ChatLog {
    messages: VecDeque<ChatMessage>,
    capacity: usize,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHAT_LOG_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            messages: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// メッセージを追加し、上限を超えた分の古いメッセージを破棄する
    pub fn append(&mut self, message: ChatMessage) {
        self.messages.push_back(message);
        while self.messages.len() > self.capacity {
            self.messages.pop_front();
        }
    }

    /// 追加順に並んだ履歴のスナップショット
    pub fn snapshot(&self) -> Vec<ChatMessage> {
        self.messages.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Default for ChatLog {
    fn default() -> Self {
        Self::new()
    }
}
