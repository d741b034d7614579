//! Integration tests for the collaboration server.
//!
//! Each test starts the server in-process on an ephemeral port and talks to it
//! over real WebSocket and HTTP connections.

use std::{sync::Arc, time::Duration};

use axum::{Json, Router, routing::post};
use futures_util::{SinkExt, StreamExt};
use kyodo_server::{
    config::{CompilerConfig, CompilerCredentials, SessionConfig},
    domain::Compiler,
    infrastructure::{
        compiler::{DemoCompiler, build_compiler},
        dto::websocket::{ClientEvent, ServerEvent},
        message_pusher::WebSocketMessagePusher,
        repository::InMemoryConnectionRepository,
        room::RoomDirectory,
    },
    ui::{Server, state::AppState},
    usecase::{
        CompileCodeUseCase, ConnectParticipantUseCase, DisconnectParticipantUseCase,
        GetRoomStatsUseCase, JoinRoomUseCase, NotifyTypingUseCase, RelayCodeUseCase,
        SendMessageUseCase,
    },
};
use kyodo_shared::time::SystemClock;
use serde_json::{Value, json};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

/// Helper struct to manage an in-process server
struct TestServer {
    address: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn start() -> Self {
        Self::start_with(SessionConfig::default(), Arc::new(DemoCompiler)).await
    }

    async fn start_with(session_config: SessionConfig, compiler: Arc<dyn Compiler>) -> Self {
        let repository = Arc::new(InMemoryConnectionRepository::new());
        let message_pusher = Arc::new(WebSocketMessagePusher::new());
        let rooms = Arc::new(RoomDirectory::new(message_pusher.clone(), session_config));
        let clock = Arc::new(SystemClock);

        let app_state = AppState {
            connect_participant_usecase: Arc::new(ConnectParticipantUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            )),
            disconnect_participant_usecase: Arc::new(DisconnectParticipantUseCase::new(
                repository.clone(),
                message_pusher,
                rooms.clone(),
            )),
            join_room_usecase: Arc::new(JoinRoomUseCase::new(repository.clone(), rooms.clone())),
            relay_code_usecase: Arc::new(RelayCodeUseCase::new(
                repository.clone(),
                rooms.clone(),
            )),
            send_message_usecase: Arc::new(SendMessageUseCase::new(
                repository.clone(),
                rooms.clone(),
                clock.clone(),
            )),
            notify_typing_usecase: Arc::new(NotifyTypingUseCase::new(
                repository.clone(),
                rooms.clone(),
            )),
            get_room_stats_usecase: Arc::new(GetRoomStatsUseCase::new(repository, rooms)),
            compile_code_usecase: Arc::new(CompileCodeUseCase::new(compiler)),
            clock,
        };

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();
        let server = Server::new(app_state);
        let handle = tokio::spawn(async move {
            server.serve(listener).await.unwrap();
        });

        TestServer { address, handle }
    }

    fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.address)
    }

    fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.address, path)
    }

    async fn connect(&self) -> TestClient {
        let (stream, _) = connect_async(self.ws_url()).await.unwrap();
        TestClient { stream }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Helper struct for a WebSocket client
struct TestClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TestClient {
    async fn send(&mut self, event: ClientEvent) {
        let text = serde_json::to_string(&event).unwrap();
        self.stream.send(Message::text(text)).await.unwrap();
    }

    async fn send_raw(&mut self, text: &str) {
        self.stream.send(Message::text(text)).await.unwrap();
    }

    async fn recv(&mut self) -> ServerEvent {
        self.try_recv(Duration::from_secs(5))
            .await
            .expect("timed out waiting for event")
    }

    /// Waits up to `timeout` for the next event
    async fn try_recv(&mut self, timeout: Duration) -> Option<ServerEvent> {
        loop {
            let msg = tokio::time::timeout(timeout, self.stream.next())
                .await
                .ok()?
                .expect("stream closed")
                .unwrap();
            if let Message::Text(text) = msg {
                return Some(serde_json::from_str(text.as_str()).unwrap());
            }
        }
    }

    async fn join(&mut self, room_id: &str, display_name: &str) -> String {
        self.send(ClientEvent::Join {
            room_id: room_id.to_string(),
            display_name: display_name.to_string(),
        })
        .await;
        let connection_id = match self.recv().await {
            ServerEvent::Joined { connection_id, .. } => connection_id,
            other => panic!("expected joined, got {:?}", other),
        };
        assert!(matches!(self.recv().await, ServerEvent::ChatHistory { .. }));
        connection_id
    }

    async fn close(mut self) {
        self.stream.close(None).await.unwrap();
    }
}

const QUIET: Duration = Duration::from_millis(300);

#[tokio::test]
async fn test_second_joiner_receives_document_via_sync() {
    // テスト項目: 後から参加した接続が、既存メンバーからの同期でドキュメントを受け取る
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = server.connect().await;
    let alice_id = alice.join("r1", "Alice").await;

    // when (操作):
    let mut bob = server.connect().await;
    bob.send(ClientEvent::Join {
        room_id: "r1".to_string(),
        display_name: "Bob".to_string(),
    })
    .await;

    // then (期待する結果):
    let (members, bob_id) = match alice.recv().await {
        ServerEvent::Joined {
            members,
            display_name,
            connection_id,
        } => {
            assert_eq!(display_name, "Bob");
            (members, connection_id)
        }
        other => panic!("expected joined, got {:?}", other),
    };
    assert_eq!(members.len(), 2);
    assert_eq!(members[0].connection_id, alice_id);
    assert!(matches!(bob.recv().await, ServerEvent::Joined { .. }));
    assert_eq!(bob.recv().await, ServerEvent::ChatHistory { messages: vec![] });

    alice
        .send(ClientEvent::SyncCodeRequest {
            code: "int main(){}".to_string(),
            target_connection_id: bob_id,
        })
        .await;
    assert_eq!(
        bob.recv().await,
        ServerEvent::CodeChange {
            code: "int main(){}".to_string()
        }
    );
    assert_eq!(alice.try_recv(QUIET).await, None);
}

#[tokio::test]
async fn test_code_change_and_chat_are_not_echoed() {
    // テスト項目: code-change とチャットは送信者以外にだけ届く
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = server.connect().await;
    let mut bob = server.connect().await;
    alice.join("r1", "Alice").await;
    bob.join("r1", "Bob").await;
    assert!(matches!(alice.recv().await, ServerEvent::Joined { .. }));

    // when (操作):
    bob.send(ClientEvent::CodeChange {
        room_id: "r1".to_string(),
        code: "x".to_string(),
    })
    .await;
    alice
        .send(ClientEvent::ChatMessage {
            display_name: "Alice".to_string(),
            body: "hi".to_string(),
            sent_at: None,
        })
        .await;

    // then (期待する結果):
    assert_eq!(
        alice.recv().await,
        ServerEvent::CodeChange {
            code: "x".to_string()
        }
    );
    match bob.recv().await {
        ServerEvent::ChatMessage(message) => {
            assert_eq!(message.display_name, "Alice");
            assert_eq!(message.body, "hi");
            assert!(message.sent_at > 0);
        }
        other => panic!("expected chat_message, got {:?}", other),
    }
    assert_eq!(alice.try_recv(QUIET).await, None);
    assert_eq!(bob.try_recv(QUIET).await, None);
}

#[tokio::test]
async fn test_disconnect_is_announced_and_room_is_discarded() {
    // テスト項目: 切断が残りのメンバーに通知され、空になったルームは履歴ごと破棄される
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = server.connect().await;
    let mut bob = server.connect().await;
    alice.join("r1", "Alice").await;
    let bob_id = bob.join("r1", "Bob").await;
    assert!(matches!(alice.recv().await, ServerEvent::Joined { .. }));
    alice
        .send(ClientEvent::ChatMessage {
            display_name: "Alice".to_string(),
            body: "before".to_string(),
            sent_at: None,
        })
        .await;
    assert!(matches!(bob.recv().await, ServerEvent::ChatMessage(_)));

    // when (操作):
    bob.close().await;

    // then (期待する結果):
    assert_eq!(
        alice.recv().await,
        ServerEvent::Disconnected {
            connection_id: bob_id,
            display_name: "Bob".to_string(),
        }
    );

    alice.send(ClientEvent::Leave).await;
    tokio::time::sleep(QUIET).await;
    let mut carol = server.connect().await;
    carol
        .send(ClientEvent::Join {
            room_id: "r1".to_string(),
            display_name: "Carol".to_string(),
        })
        .await;
    assert!(matches!(
        carol.recv().await,
        ServerEvent::Joined { members, .. } if members.len() == 1
    ));
    assert_eq!(carol.recv().await, ServerEvent::ChatHistory { messages: vec![] });
}

#[tokio::test]
async fn test_typing_indicator_expires() {
    // テスト項目: タイピング通知が一定時間後に停止通知に変わる
    // given (前提条件):
    let config = SessionConfig {
        typing_timeout: Duration::from_millis(200),
        ..SessionConfig::default()
    };
    let server = TestServer::start_with(config, Arc::new(DemoCompiler)).await;
    let mut alice = server.connect().await;
    let mut bob = server.connect().await;
    alice.join("r1", "Alice").await;
    bob.join("r1", "Bob").await;
    assert!(matches!(alice.recv().await, ServerEvent::Joined { .. }));

    // when (操作):
    alice
        .send(ClientEvent::UserTyping {
            display_name: "Alice".to_string(),
        })
        .await;

    // then (期待する結果):
    assert_eq!(
        bob.recv().await,
        ServerEvent::UserTyping {
            display_name: "Alice".to_string()
        }
    );
    assert_eq!(
        bob.recv().await,
        ServerEvent::UserStoppedTyping {
            display_name: "Alice".to_string()
        }
    );
    assert_eq!(alice.try_recv(QUIET).await, None);
}

#[tokio::test]
async fn test_malformed_and_out_of_room_events_are_ignored() {
    // テスト項目: 不正なイベントや参加前のイベントは無視され、接続は維持される
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = server.connect().await;

    // when (操作):
    alice.send_raw("not json").await;
    alice.send_raw(r#"{"type":"unknown"}"#).await;
    alice
        .send(ClientEvent::ChatMessage {
            display_name: "Alice".to_string(),
            body: "too early".to_string(),
            sent_at: None,
        })
        .await;

    // then (期待する結果):
    assert_eq!(alice.try_recv(QUIET).await, None);
    alice.join("r1", "Alice").await;
}

#[tokio::test]
async fn test_health_and_room_stats() {
    // テスト項目: ヘルスチェックとルーム統計が参加状況を反映する
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = server.connect().await;
    alice.join("r1", "Alice").await;
    let _idle = server.connect().await;
    alice
        .send(ClientEvent::ChatMessage {
            display_name: "Alice".to_string(),
            body: "hi".to_string(),
            sent_at: None,
        })
        .await;
    tokio::time::sleep(QUIET).await;
    let client = reqwest::Client::new();

    // when (操作):
    let health: Value = client
        .get(server.http_url("/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let stats: Value = client
        .get(server.http_url("/rooms/r1/stats"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let unknown: Value = client
        .get(server.http_url("/rooms/nowhere/stats"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(health["status"], "ok");
    assert_eq!(health["connectedUsers"], 1);
    assert_eq!(health["activeRooms"], 1);
    assert!(health["timestamp"].as_str().unwrap().ends_with('Z'));
    assert_eq!(
        stats,
        json!({
            "roomId": "r1",
            "connectedUsers": 1,
            "users": ["Alice"],
            "messageCount": 1
        })
    );
    assert_eq!(unknown["connectedUsers"], 0);
    assert_eq!(unknown["messageCount"], 0);
}

#[tokio::test]
async fn test_compile_with_demo_compiler() {
    // テスト項目: 認証情報が無い場合はデモ出力が返り、入力不足は 400 になる
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    // when (操作):
    let ok = client
        .post(server.http_url("/compile"))
        .json(&json!({ "code": "print(1)", "language": "python3" }))
        .send()
        .await
        .unwrap();
    let missing = client
        .post(server.http_url("/compile"))
        .json(&json!({ "language": "python3" }))
        .send()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(ok.status(), reqwest::StatusCode::OK);
    let body: Value = ok.json().await.unwrap();
    assert_eq!(body["compilationStatus"], "success");
    assert_eq!(body["isMock"], true);
    assert!(body["outputText"].as_str().unwrap().contains("print(1)"));

    assert_eq!(missing.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: Value = missing.json().await.unwrap();
    assert_eq!(body["errorKind"], "invalid_request");
}

#[tokio::test]
async fn test_malformed_compile_body_is_invalid_request() {
    // テスト項目: 型の誤り・JSON でない本文・Content-Type なしは、いずれも 400 と
    //             invalid_request の分類で返る
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();
    let url = server.http_url("/compile");

    // when (操作):
    let wrong_type = client
        .post(&url)
        .json(&json!({ "code": 5, "language": "python3" }))
        .send()
        .await
        .unwrap();
    let not_json = client
        .post(&url)
        .header("content-type", "application/json")
        .body("not json")
        .send()
        .await
        .unwrap();
    let no_content_type = client
        .post(&url)
        .body(r#"{"code":"print(1)","language":"python3"}"#)
        .send()
        .await
        .unwrap();

    // then (期待する結果):
    for response in [wrong_type, not_json, no_content_type] {
        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["errorKind"], "invalid_request");
        assert_eq!(body["error"], "Code and language are required");
    }
}

#[tokio::test]
async fn test_compile_timeout_is_reported() {
    // テスト項目: 実行サービスが応答しない場合は 408 とタイムアウトの分類が返る
    // given (前提条件):
    let upstream = Router::new().route(
        "/execute",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({ "statusCode": 200 }))
        }),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let upstream_address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, upstream).await.unwrap();
    });
    let compiler = build_compiler(&CompilerConfig {
        endpoint: format!("http://{}/execute", upstream_address),
        timeout: Duration::from_millis(200),
        credentials: Some(CompilerCredentials {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
        }),
    })
    .unwrap();
    let server = TestServer::start_with(SessionConfig::default(), compiler).await;

    // when (操作):
    let response = reqwest::Client::new()
        .post(server.http_url("/compile"))
        .json(&json!({ "code": "int main(){}", "language": "cpp" }))
        .send()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(response.status(), reqwest::StatusCode::REQUEST_TIMEOUT);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["errorKind"], "timeout");
}
