//! UseCase: タイピング通知
//!
//! 送信者以外のメンバーに user_typing を配信する。停止通知はルームアクターの
//! タイマーが一定時間後に送る。

use std::sync::Arc;

use crate::{
    domain::{ConnectionId, ConnectionRepository, DisplayName},
    infrastructure::room::{RoomCommand, RoomDirectory},
};

use super::SessionError;

pub struct NotifyTypingUseCase {
    repository: Arc<dyn ConnectionRepository>,
    rooms: Arc<RoomDirectory>,
}

impl NotifyTypingUseCase {
    pub fn new(repository: Arc<dyn ConnectionRepository>, rooms: Arc<RoomDirectory>) -> Self {
        Self { repository, rooms }
    }

    pub async fn execute(
        &self,
        sender: ConnectionId,
        display_name: DisplayName,
    ) -> Result<(), SessionError> {
        let room_id = self
            .repository
            .current_room(&sender)
            .await
            .ok_or(SessionError::NotInRoom)?;

        let command = RoomCommand::TypingStart {
            sender,
            display_name,
        };
        if self.rooms.dispatch(&room_id, command).await {
            Ok(())
        } else {
            Err(SessionError::RoomUnavailable(room_id))
        }
    }
}
