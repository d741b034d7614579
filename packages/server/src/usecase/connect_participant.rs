//! UseCase: 接続処理
//!
//! トランスポート接続時に接続 ID を発行し、接続レジストリと MessagePusher に登録する。
//! 表示名とルームは join 時に設定される。

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRepository, MessagePusher, PusherChannel};

/// 接続のユースケース
pub struct ConnectParticipantUseCase {
    /// Repository（接続レジストリの抽象化）
    repository: Arc<dyn ConnectionRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectParticipantUseCase {
    pub fn new(
        repository: Arc<dyn ConnectionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 接続を登録し、発行した接続 ID を返す
    ///
    /// # Arguments
    ///
    /// * `sender` - クライアントへのメッセージ送信用チャンネル
    pub async fn execute(&self, sender: PusherChannel) -> ConnectionId {
        let connection_id = ConnectionId::generate();
        self.repository.register(connection_id).await;
        self.message_pusher
            .register_client(connection_id, sender)
            .await;
        connection_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::test_support::Fixture;

    #[tokio::test]
    async fn test_connect_registers_connection_and_channel() {
        // テスト項目: 接続すると接続 ID が発行され、送信チャンネルが登録される
        // given (前提条件):
        let fixture = Fixture::new();
        let usecase = ConnectParticipantUseCase::new(
            fixture.repository.clone(),
            fixture.message_pusher.clone(),
        );
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        // when (操作):
        let connection_id = usecase.execute(tx).await;

        // then (期待する結果):
        assert!(fixture.repository.current_room(&connection_id).await.is_none());
        assert!(
            fixture
                .message_pusher
                .push_to(&connection_id, "ping")
                .await
                .is_ok()
        );
        assert_eq!(rx.recv().await, Some("ping".to_string()));
    }

    #[tokio::test]
    async fn test_each_connection_gets_unique_id() {
        // テスト項目: 接続ごとに異なる接続 ID が発行される
        // given (前提条件):
        let fixture = Fixture::new();
        let usecase = ConnectParticipantUseCase::new(
            fixture.repository.clone(),
            fixture.message_pusher.clone(),
        );

        // when (操作):
        let (tx1, _rx1) = tokio::sync::mpsc::unbounded_channel();
        let (tx2, _rx2) = tokio::sync::mpsc::unbounded_channel();
        let first = usecase.execute(tx1).await;
        let second = usecase.execute(tx2).await;

        // then (期待する結果):
        assert_ne!(first, second);
        assert_eq!(fixture.message_pusher.client_count().await, 2);
    }
}
