//! UseCase のテスト用の共通セットアップ

use std::{sync::Arc, time::Duration};

use tokio::sync::mpsc;

use crate::{
    config::SessionConfig,
    domain::{ConnectionId, ConnectionRepository, MessagePusher, RoomId},
    infrastructure::{
        dto::websocket::ServerEvent, message_pusher::WebSocketMessagePusher,
        repository::InMemoryConnectionRepository, room::RoomDirectory,
    },
};

/// 実際のレジストリ・送信・ルームアクターを組み合わせたテスト環境
pub(crate) struct Fixture {
    pub repository: Arc<InMemoryConnectionRepository>,
    pub message_pusher: Arc<WebSocketMessagePusher>,
    pub rooms: Arc<RoomDirectory>,
}

impl Fixture {
    pub fn new() -> Self {
        let message_pusher = Arc::new(WebSocketMessagePusher::new());
        Self {
            repository: Arc::new(InMemoryConnectionRepository::new()),
            rooms: Arc::new(RoomDirectory::new(
                message_pusher.clone(),
                SessionConfig::default(),
            )),
            message_pusher,
        }
    }

    /// 接続を登録し、その接続宛てのイベントを受け取るクライアントを返す
    pub async fn connect(&self) -> TestClient {
        let (tx, rx) = mpsc::unbounded_channel();
        let connection_id = ConnectionId::generate();
        self.repository.register(connection_id).await;
        self.message_pusher.register_client(connection_id, tx).await;
        TestClient { connection_id, rx }
    }

    /// ルームのキューに積まれたコマンドが処理されるのを待つ
    pub async fn settle(&self, room_id: &str) {
        self.rooms.stats(&RoomId::new(room_id)).await;
    }
}

pub(crate) struct TestClient {
    pub connection_id: ConnectionId,
    rx: mpsc::UnboundedReceiver<String>,
}

impl TestClient {
    pub async fn next_event(&mut self) -> ServerEvent {
        let json = tokio::time::timeout(Duration::from_secs(5), self.rx.recv())
            .await
            .expect("timed out waiting for event")
            .expect("channel closed");
        serde_json::from_str(&json).expect("invalid event json")
    }

    /// 受信済みのイベントを全て取り出す
    pub fn drain(&mut self) -> Vec<ServerEvent> {
        std::iter::from_fn(|| self.rx.try_recv().ok())
            .map(|json| serde_json::from_str(&json).expect("invalid event json"))
            .collect()
    }
}
