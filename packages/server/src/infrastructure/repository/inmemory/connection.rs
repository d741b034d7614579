//! InMemory Connection Repository 実装
//!
//! ドメイン層が定義する ConnectionRepository trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。プロセスの終了とともに消えます。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionEntry, ConnectionId, ConnectionRepository, DisplayName, RegistryError, RoomId,
};

/// インメモリ Connection Repository 実装
#[derive(Default)]
pub struct InMemoryConnectionRepository {
    connections: Mutex<HashMap<ConnectionId, ConnectionEntry>>,
}

impl InMemoryConnectionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConnectionRepository for InMemoryConnectionRepository {
    async fn register(&self, connection_id: ConnectionId) {
        let mut connections = self.connections.lock().await;
        connections.entry(connection_id).or_default();
    }

    async fn begin_join(
        &self,
        connection_id: &ConnectionId,
        room_id: RoomId,
        display_name: DisplayName,
    ) -> Result<(), RegistryError> {
        let mut connections = self.connections.lock().await;
        let entry = connections
            .get_mut(connection_id)
            .ok_or_else(|| RegistryError::UnknownConnection(connection_id.to_string()))?;

        if let Some(current) = &entry.current_room {
            return Err(RegistryError::AlreadyInRoom(current.clone()));
        }
        entry.display_name = Some(display_name);
        entry.current_room = Some(room_id);
        Ok(())
    }

    async fn current_room(&self, connection_id: &ConnectionId) -> Option<RoomId> {
        let connections = self.connections.lock().await;
        connections
            .get(connection_id)
            .and_then(|entry| entry.current_room.clone())
    }

    async fn leave_room(&self, connection_id: &ConnectionId) -> Option<(RoomId, DisplayName)> {
        let mut connections = self.connections.lock().await;
        let entry = connections.get_mut(connection_id)?;
        let room_id = entry.current_room.take()?;
        let display_name = entry.display_name.take().unwrap_or_else(|| DisplayName::new(""));
        Some((room_id, display_name))
    }

    async fn unregister(&self, connection_id: &ConnectionId) -> Option<ConnectionEntry> {
        let mut connections = self.connections.lock().await;
        connections.remove(connection_id)
    }

    async fn count_joined(&self) -> usize {
        let connections = self.connections.lock().await;
        connections
            .values()
            .filter(|entry| entry.current_room.is_some())
            .count()
    }
}
