//! ルームの状態遷移
//!
//! メンバー、チャット履歴、タイピング状態、同期待ちの接続を保持する。
//! 各操作は副作用を持たず、配信すべきイベント（[`Delivery`]）を返す。
//! 実際の送信はルームアクターが行う。

use super::{ChatLog, ChatMessage, ConnectionId, DisplayName, Member, RoomId, TypingTracker};

/// ルームからクライアントへ配信されるイベント
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomEvent {
    /// メンバー一覧のスナップショット（`joined` は今回参加したメンバー）
    Joined { members: Vec<Member>, joined: Member },
    /// 参加者だけに送るチャット履歴
    ChatHistory(Vec<ChatMessage>),
    /// ドキュメント全文
    CodeChanged { code: String },
    /// 退出通知
    Departed(Member),
    ChatPosted(ChatMessage),
    TypingStarted(DisplayName),
    TypingStopped(DisplayName),
    /// `target` に向けてコード同期を送るよう依頼する
    SyncNeeded { target: ConnectionId },
}

/// 配信先とイベントの組
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub targets: Vec<ConnectionId>,
    pub event: RoomEvent,
}

impl Delivery {
    fn new(targets: Vec<ConnectionId>, event: RoomEvent) -> Option<Self> {
        if targets.is_empty() {
            None
        } else {
            Some(Self { targets, event })
        }
    }
}

/// ルームの統計情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomStats {
    pub room_id: RoomId,
    pub users: Vec<DisplayName>,
    pub message_count: usize,
}

impl RoomStats {
    /// 存在しないルームの統計情報
    pub fn empty(room_id: RoomId) -> Self {
        Self {
            room_id,
            users: Vec::new(),
            message_count: 0,
        }
    }
}

/// ルームの状態
#[derive(Debug)]
pub struct RoomState {
    id: RoomId,
    /// 参加順
    members: Vec<Member>,
    chat_log: ChatLog,
    typing: TypingTracker,
    /// まだドキュメントを受け取っていない参加者
    awaiting_sync: Vec<ConnectionId>,
}

impl RoomState {
    pub fn new(id: RoomId, chat_log_capacity: usize) -> Self {
        Self {
            id,
            members: Vec::new(),
            chat_log: ChatLog::with_capacity(chat_log_capacity),
            typing: TypingTracker::new(),
            awaiting_sync: Vec::new(),
        }
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    #[cfg(test)]
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_member(&self, connection_id: &ConnectionId) -> bool {
        self.members.iter().any(|m| &m.connection_id == connection_id)
    }

    #[cfg(test)]
    pub fn is_awaiting_sync(&self, connection_id: &ConnectionId) -> bool {
        self.awaiting_sync.contains(connection_id)
    }

    pub fn stats(&self) -> RoomStats {
        RoomStats {
            room_id: self.id.clone(),
            users: self
                .members
                .iter()
                .map(|m| m.display_name.clone())
                .collect(),
            message_count: self.chat_log.len(),
        }
    }

    /// メンバーを追加する
    ///
    /// 参加者を含む全メンバーにスナップショットを、参加者にだけチャット履歴を配信する。
    /// 既にメンバーの場合は何もしない。
    pub fn join(&mut self, member: Member) -> Vec<Delivery> {
        if self.is_member(&member.connection_id) {
            return Vec::new();
        }

        if !self.members.is_empty() {
            self.awaiting_sync.push(member.connection_id);
        }
        self.members.push(member.clone());

        let snapshot = RoomEvent::Joined {
            members: self.members.clone(),
            joined: member.clone(),
        };
        let history = RoomEvent::ChatHistory(self.chat_log.snapshot());

        [
            Delivery::new(self.member_ids(), snapshot),
            Delivery::new(vec![member.connection_id], history),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// メンバーを削除する
    ///
    /// タイピング中だった場合は停止通知を、残りのメンバーに退出通知を配信する。
    /// メンバーでない場合は何もしない（冪等）。
    ///
    /// 同期待ちの参加者が残っていれば、退出したのが同期元でなくても同期を依頼し直す。
    /// どのメンバーが同期に応じている最中かは追跡しないため、重複した依頼は受け入れる
    /// （全文の転送は何度行っても同じ結果になる）。
    pub fn leave(&mut self, connection_id: &ConnectionId) -> Vec<Delivery> {
        let Some(position) = self
            .members
            .iter()
            .position(|m| &m.connection_id == connection_id)
        else {
            return Vec::new();
        };

        let member = self.members.remove(position);
        self.awaiting_sync.retain(|id| id != connection_id);

        let remaining = self.member_ids();
        let mut deliveries = Vec::new();
        if let Some(name) = self.typing.cancel(connection_id) {
            deliveries.extend(Delivery::new(
                remaining.clone(),
                RoomEvent::TypingStopped(name),
            ));
        }
        deliveries.extend(Delivery::new(remaining, RoomEvent::Departed(member)));
        deliveries.extend(self.request_pending_syncs());
        deliveries
    }

    /// ドキュメント全文を送信者以外のメンバーに配信する
    ///
    /// 全文が行き渡るため、同期待ちの状態は解消される。
    pub fn change_code(&mut self, sender: &ConnectionId, code: String) -> Vec<Delivery> {
        if !self.is_member(sender) {
            return Vec::new();
        }
        self.awaiting_sync.clear();
        Delivery::new(self.other_ids(sender), RoomEvent::CodeChanged { code })
            .into_iter()
            .collect()
    }

    /// 要求者から対象へドキュメントを一対一で転送する
    ///
    /// どちらかがメンバーでない場合は破棄する。自分自身への同期は転送するが、
    /// 同期待ちの状態は解消しない。
    pub fn sync_code(
        &mut self,
        requester: &ConnectionId,
        target: &ConnectionId,
        code: String,
    ) -> Vec<Delivery> {
        if !self.is_member(requester) || !self.is_member(target) {
            return Vec::new();
        }
        if requester != target {
            self.awaiting_sync.retain(|id| id != target);
        }
        Delivery::new(vec![*target], RoomEvent::CodeChanged { code })
            .into_iter()
            .collect()
    }

    /// チャットメッセージを履歴に追加し、送信者以外のメンバーに配信する
    pub fn post_chat(&mut self, sender: &ConnectionId, message: ChatMessage) -> Vec<Delivery> {
        if !self.is_member(sender) {
            return Vec::new();
        }
        self.chat_log.append(message.clone());
        Delivery::new(self.other_ids(sender), RoomEvent::ChatPosted(message))
            .into_iter()
            .collect()
    }

    /// タイピング開始を記録する
    ///
    /// 期限切れタイマー用の世代番号と配信内容を返す。メンバーでない場合は `None`。
    pub fn start_typing(
        &mut self,
        sender: &ConnectionId,
        display_name: DisplayName,
    ) -> Option<(u64, Vec<Delivery>)> {
        if !self.is_member(sender) {
            return None;
        }
        let generation = self.typing.start(*sender, display_name.clone());
        let deliveries = Delivery::new(
            self.other_ids(sender),
            RoomEvent::TypingStarted(display_name),
        )
        .into_iter()
        .collect();
        Some((generation, deliveries))
    }

    /// タイピングの期限切れを処理する
    ///
    /// 最新の世代の場合のみ停止通知を配信する。
    pub fn expire_typing(
        &mut self,
        connection_id: &ConnectionId,
        generation: u64,
    ) -> Vec<Delivery> {
        let Some(name) = self.typing.expire(connection_id, generation) else {
            return Vec::new();
        };
        Delivery::new(self.other_ids(connection_id), RoomEvent::TypingStopped(name))
            .into_iter()
            .collect()
    }

    /// 同期待ちの参加者について、同期済みのメンバーに同期を依頼する
    ///
    /// 依頼できるメンバーがいない場合は空のドキュメントを正として同期待ちを解消する。
    fn request_pending_syncs(&mut self) -> Vec<Delivery> {
        if self.awaiting_sync.is_empty() {
            return Vec::new();
        }
        let source = self
            .members
            .iter()
            .find(|m| !self.awaiting_sync.contains(&m.connection_id))
            .map(|m| m.connection_id);

        match source {
            Some(source) => self
                .awaiting_sync
                .iter()
                .map(|target| Delivery {
                    targets: vec![source],
                    event: RoomEvent::SyncNeeded { target: *target },
                })
                .collect(),
            None => {
                self.awaiting_sync.clear();
                Vec::new()
            }
        }
    }

    fn member_ids(&self) -> Vec<ConnectionId> {
        self.members.iter().map(|m| m.connection_id).collect()
    }

    fn other_ids(&self, exclude: &ConnectionId) -> Vec<ConnectionId> {
        self.members
            .iter()
            .map(|m| m.connection_id)
            .filter(|id| id != exclude)
            .collect()
    }
}
