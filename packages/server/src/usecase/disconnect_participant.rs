//! UseCase: 退出・切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::leave() / execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 退出した接続が残りのメンバーに通知されることを保証
//! - 同期元が抜けた場合に同期待ちの参加者が取り残されないことを保証
//! - 退出と切断が重なっても通知が 1 回だけであることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：明示的な leave、leave を経ないトランスポートの切断
//! - 冪等性：leave の後の切断、2 回目の leave

use std::sync::Arc;

use crate::{
    domain::{ConnectionId, ConnectionRepository, MessagePusher},
    infrastructure::room::{RoomCommand, RoomDirectory},
};

/// 退出・切断のユースケース
pub struct DisconnectParticipantUseCase {
    /// Repository（接続レジストリの抽象化）
    repository: Arc<dyn ConnectionRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// ルームアクターの対応表
    rooms: Arc<RoomDirectory>,
}

impl DisconnectParticipantUseCase {
    pub fn new(
        repository: Arc<dyn ConnectionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        rooms: Arc<RoomDirectory>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            rooms,
        }
    }

    /// 参加中のルームから退出する（接続は維持する）
    ///
    /// ルームに参加していない場合は何もしない。
    pub async fn leave(&self, connection_id: ConnectionId) {
        let Some((room_id, display_name)) = self.repository.leave_room(&connection_id).await
        else {
            return;
        };

        tracing::debug!("'{}' ({}) leaving room '{}'", display_name, connection_id, room_id);
        if !self
            .rooms
            .dispatch(&room_id, RoomCommand::Leave(connection_id))
            .await
        {
            tracing::warn!("Room '{}' was already closed when {} left", room_id, connection_id);
        }
    }

    /// 切断処理を実行
    ///
    /// 1. 参加中のルームから退出
    /// 2. 接続レジストリから削除
    /// 3. MessagePusher から送信チャンネルを削除
    pub async fn execute(&self, connection_id: ConnectionId) {
        self.leave(connection_id).await;
        self.repository.unregister(&connection_id).await;
        self.message_pusher.unregister_client(&connection_id).await;
    }
}
