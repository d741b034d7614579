//! ルームアクター
//!
//! ルームの状態に対する全ての変更はこのタスク内で順に行われる。

use std::{collections::HashMap, sync::Arc, time::Duration};

use tokio::sync::{Mutex, mpsc, oneshot};

use super::TypingAlarms;
use crate::{
    domain::{
        ChatMessage, ConnectionId, Delivery, DisplayName, Member, MessagePusher, RoomId,
        RoomState, RoomStats,
    },
    infrastructure::dto::websocket::ServerEvent,
};

/// ルームアクターへのコマンド
#[derive(Debug)]
pub enum RoomCommand {
    Join(Member),
    Leave(ConnectionId),
    CodeChange {
        sender: ConnectionId,
        code: String,
    },
    SyncCode {
        requester: ConnectionId,
        target: ConnectionId,
        code: String,
    },
    Chat {
        sender: ConnectionId,
        message: ChatMessage,
    },
    TypingStart {
        sender: ConnectionId,
        display_name: DisplayName,
    },
    TypingExpired {
        connection_id: ConnectionId,
        generation: u64,
    },
    Stats(oneshot::Sender<RoomStats>),
}

/// ルーム ID からアクターへの送信口
pub(super) type RoomTable = HashMap<RoomId, mpsc::UnboundedSender<RoomCommand>>;

pub(super) struct RoomActor {
    state: RoomState,
    commands: mpsc::UnboundedReceiver<RoomCommand>,
    /// タイマーから自分宛てにコマンドを送るための送信口
    handle: mpsc::UnboundedSender<RoomCommand>,
    rooms: Arc<Mutex<RoomTable>>,
    message_pusher: Arc<dyn MessagePusher>,
    alarms: TypingAlarms,
    typing_timeout: Duration,
}

impl RoomActor {
    pub(super) fn new(
        state: RoomState,
        commands: mpsc::UnboundedReceiver<RoomCommand>,
        handle: mpsc::UnboundedSender<RoomCommand>,
        rooms: Arc<Mutex<RoomTable>>,
        message_pusher: Arc<dyn MessagePusher>,
        typing_timeout: Duration,
    ) -> Self {
        Self {
            state,
            commands,
            handle,
            rooms,
            message_pusher,
            alarms: TypingAlarms::new(),
            typing_timeout,
        }
    }

    /// コマンドを処理し続け、メンバーがいなくなったら停止する
    pub(super) async fn run(mut self) {
        tracing::debug!("Room '{}' opened", self.state.id());

        while let Some(command) = self.commands.recv().await {
            let deliveries = self.handle_command(command);
            self.deliver(deliveries).await;

            if self.state.is_empty() && self.retire().await {
                break;
            }
        }

        self.alarms.cancel_all();
        tracing::debug!("Room '{}' closed", self.state.id());
    }

    fn handle_command(&mut self, command: RoomCommand) -> Vec<Delivery> {
        match command {
            RoomCommand::Join(member) => {
                tracing::info!(
                    "'{}' ({}) joined room '{}'",
                    member.display_name,
                    member.connection_id,
                    self.state.id()
                );
                self.state.join(member)
            }
            RoomCommand::Leave(connection_id) => {
                self.alarms.cancel(&connection_id);
                let deliveries = self.state.leave(&connection_id);
                tracing::info!("{} left room '{}'", connection_id, self.state.id());
                deliveries
            }
            RoomCommand::CodeChange { sender, code } => {
                tracing::debug!("Code change from {} ({} bytes)", sender, code.len());
                self.state.change_code(&sender, code)
            }
            RoomCommand::SyncCode {
                requester,
                target,
                code,
            } => {
                tracing::debug!("Code sync from {} to {}", requester, target);
                self.state.sync_code(&requester, &target, code)
            }
            RoomCommand::Chat { sender, message } => self.state.post_chat(&sender, message),
            RoomCommand::TypingStart {
                sender,
                display_name,
            } => match self.state.start_typing(&sender, display_name) {
                Some((generation, deliveries)) => {
                    self.alarms.arm(
                        sender,
                        generation,
                        self.typing_timeout,
                        self.handle.clone(),
                    );
                    deliveries
                }
                None => Vec::new(),
            },
            RoomCommand::TypingExpired {
                connection_id,
                generation,
            } => {
                self.alarms.fired(&connection_id, generation);
                self.state.expire_typing(&connection_id, generation)
            }
            RoomCommand::Stats(reply) => {
                let _ = reply.send(self.state.stats());
                Vec::new()
            }
        }
    }

    async fn deliver(&self, deliveries: Vec<Delivery>) {
        for delivery in deliveries {
            let event = ServerEvent::from(delivery.event);
            let json = match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("Failed to serialize event: {}", e);
                    continue;
                }
            };
            if let Err(e) = self.message_pusher.broadcast(delivery.targets, &json).await {
                tracing::warn!("Failed to deliver event in room '{}': {}", self.state.id(), e);
            }
        }
    }

    /// 空のルームをディレクトリから外す
    ///
    /// join の送信と同じロックの下でキューが空であることを確認するため、
    /// 停止するアクターに join が取り残されることはない。
    async fn retire(&mut self) -> bool {
        let mut rooms = self.rooms.lock().await;
        if !self.commands.is_empty() {
            return false;
        }
        let id = self.state.id();
        if rooms
            .get(id)
            .is_some_and(|sender| sender.same_channel(&self.handle))
        {
            rooms.remove(id);
        }
        true
    }
}
