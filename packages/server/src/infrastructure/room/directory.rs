//! Room Directory
//!
//! ルーム ID から実行中のルームアクターを引く。ルームは最初の join で作成され、
//! メンバーがいなくなるとアクター自身がディレクトリから外れる。

use std::{collections::HashMap, sync::Arc};

use tokio::sync::{Mutex, mpsc, oneshot};

use super::{
    RoomCommand,
    actor::{RoomActor, RoomTable},
};
use crate::{
    config::SessionConfig,
    domain::{Member, MessagePusher, RoomId, RoomState, RoomStats},
};

/// ルーム ID → ルームアクターの対応表
pub struct RoomDirectory {
    rooms: Arc<Mutex<RoomTable>>,
    message_pusher: Arc<dyn MessagePusher>,
    config: SessionConfig,
}

impl RoomDirectory {
    pub fn new(message_pusher: Arc<dyn MessagePusher>, config: SessionConfig) -> Self {
        Self {
            rooms: Arc::new(Mutex::new(HashMap::new())),
            message_pusher,
            config,
        }
    }

    /// ルームに join コマンドを送る（ルームが無ければ作成する）
    pub async fn join(&self, room_id: RoomId, member: Member) {
        let mut rooms = self.rooms.lock().await;
        let mut command = RoomCommand::Join(member);

        if let Some(sender) = rooms.get(&room_id) {
            match sender.send(command) {
                Ok(()) => return,
                // アクターが異常終了していた場合は作り直す
                Err(mpsc::error::SendError(returned)) => command = returned,
            }
        }

        let sender = self.spawn_room(room_id.clone());
        if sender.send(command).is_err() {
            tracing::error!("Room '{}' stopped before accepting a join", room_id);
        }
        rooms.insert(room_id, sender);
    }

    /// 既存のルームにコマンドを送る
    ///
    /// ルームが存在しない場合は `false` を返す。
    pub async fn dispatch(&self, room_id: &RoomId, command: RoomCommand) -> bool {
        let rooms = self.rooms.lock().await;
        match rooms.get(room_id) {
            Some(sender) => sender.send(command).is_ok(),
            None => {
                tracing::debug!("Room '{}' not found, dropping command", room_id);
                false
            }
        }
    }

    /// ルームの統計情報（存在しないルームは空）
    pub async fn stats(&self, room_id: &RoomId) -> RoomStats {
        let (reply, response) = oneshot::channel();
        if !self.dispatch(room_id, RoomCommand::Stats(reply)).await {
            return RoomStats::empty(room_id.clone());
        }
        response
            .await
            .unwrap_or_else(|_| RoomStats::empty(room_id.clone()))
    }

    /// 稼働中のルーム数
    pub async fn active_rooms(&self) -> usize {
        self.rooms.lock().await.len()
    }

    fn spawn_room(&self, room_id: RoomId) -> mpsc::UnboundedSender<RoomCommand> {
        let (sender, commands) = mpsc::unbounded_channel();
        let actor = RoomActor::new(
            RoomState::new(room_id, self.config.chat_log_capacity),
            commands,
            sender.clone(),
            self.rooms.clone(),
            self.message_pusher.clone(),
            self.config.typing_timeout,
        );
        tokio::spawn(actor.run());
        sender
    }
}
