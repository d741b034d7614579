//! UseCase: チャットメッセージ送信
//!
//! メッセージにサーバーの時刻を付けてルームの履歴に追加し、
//! 送信者以外のメンバーに配信する。

use std::sync::Arc;

use kyodo_shared::time::Clock;

use crate::{
    domain::{ChatMessage, ConnectionId, ConnectionRepository, DisplayName, Timestamp},
    infrastructure::room::{RoomCommand, RoomDirectory},
};

use super::SessionError;

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// Repository（接続レジストリの抽象化）
    repository: Arc<dyn ConnectionRepository>,
    /// ルームアクターの対応表
    rooms: Arc<RoomDirectory>,
    /// 送信時刻の取得元
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
    pub fn new(
        repository: Arc<dyn ConnectionRepository>,
        rooms: Arc<RoomDirectory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            rooms,
            clock,
        }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `sender` - 送信者の接続 ID
    /// * `display_name` - メッセージに表示する名前
    /// * `body` - メッセージ本文
    ///
    /// # Returns
    ///
    /// * `Ok(ChatMessage)` - 履歴に追加されるメッセージ
    /// * `Err(SessionError)` - ルームに参加していない
    pub async fn execute(
        &self,
        sender: ConnectionId,
        display_name: DisplayName,
        body: String,
    ) -> Result<ChatMessage, SessionError> {
        let room_id = self
            .repository
            .current_room(&sender)
            .await
            .ok_or(SessionError::NotInRoom)?;

        let message = ChatMessage::new(
            display_name,
            body,
            Timestamp::new(self.clock.now_millis()),
        );

        let command = RoomCommand::Chat {
            sender,
            message: message.clone(),
        };
        if !self.rooms.dispatch(&room_id, command).await {
            return Err(SessionError::RoomUnavailable(room_id));
        }

        Ok(message)
    }
}
