//! UseCase: ルーム統計・サーバー状態の取得

use std::sync::Arc;

use crate::{
    domain::{ConnectionRepository, RoomId, RoomStats},
    infrastructure::room::RoomDirectory,
};

/// サーバー全体の状態（ヘルスチェック用）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerStatus {
    /// ルームに参加中の接続数
    pub connected_users: usize,
    pub active_rooms: usize,
}

pub struct GetRoomStatsUseCase {
    repository: Arc<dyn ConnectionRepository>,
    rooms: Arc<RoomDirectory>,
}

impl GetRoomStatsUseCase {
    pub fn new(repository: Arc<dyn ConnectionRepository>, rooms: Arc<RoomDirectory>) -> Self {
        Self { repository, rooms }
    }

    /// ルームの統計情報（存在しないルームは空の統計）
    pub async fn execute(&self, room_id: RoomId) -> RoomStats {
        self.rooms.stats(&room_id).await
    }

    pub async fn server_status(&self) -> ServerStatus {
        ServerStatus {
            connected_users: self.repository.count_joined().await,
            active_rooms: self.rooms.active_rooms().await,
        }
    }
}
