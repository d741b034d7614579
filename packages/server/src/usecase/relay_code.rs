//! UseCase: コードの中継
//!
//! ドキュメントの全文をルームの他のメンバーに中継する（code-change）か、
//! 新しい参加者に一対一で転送する（sync-code-request）。
//! サーバーはドキュメントを保持しない。

use std::sync::Arc;

use crate::{
    domain::{ConnectionId, ConnectionRepository, RoomId},
    infrastructure::room::{RoomCommand, RoomDirectory},
};

use super::SessionError;

/// コード中継のユースケース
pub struct RelayCodeUseCase {
    repository: Arc<dyn ConnectionRepository>,
    rooms: Arc<RoomDirectory>,
}

impl RelayCodeUseCase {
    pub fn new(repository: Arc<dyn ConnectionRepository>, rooms: Arc<RoomDirectory>) -> Self {
        Self { repository, rooms }
    }

    /// 編集後の全文を送信者以外のメンバーに配信
    ///
    /// `room_id` は送信者が参加中のルームと一致していなければならない。
    pub async fn change_code(
        &self,
        sender: ConnectionId,
        room_id: RoomId,
        code: String,
    ) -> Result<(), SessionError> {
        let joined = self
            .repository
            .current_room(&sender)
            .await
            .ok_or(SessionError::NotInRoom)?;
        if joined != room_id {
            return Err(SessionError::RoomMismatch {
                joined,
                requested: room_id,
            });
        }

        self.send(&joined, RoomCommand::CodeChange { sender, code })
            .await
    }

    /// 全文を指定された接続にだけ転送
    ///
    /// 転送先は要求者と同じルームのメンバーでなければ破棄される。
    pub async fn sync_code(
        &self,
        requester: ConnectionId,
        target: &str,
        code: String,
    ) -> Result<(), SessionError> {
        let target = ConnectionId::parse(target)
            .ok_or_else(|| SessionError::InvalidConnectionId(target.to_string()))?;
        let room_id = self
            .repository
            .current_room(&requester)
            .await
            .ok_or(SessionError::NotInRoom)?;

        self.send(
            &room_id,
            RoomCommand::SyncCode {
                requester,
                target,
                code,
            },
        )
        .await
    }

    async fn send(&self, room_id: &RoomId, command: RoomCommand) -> Result<(), SessionError> {
        if self.rooms.dispatch(room_id, command).await {
            Ok(())
        } else {
            Err(SessionError::RoomUnavailable(room_id.clone()))
        }
    }
}
