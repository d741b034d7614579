//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, DisplayName, RoomId},
    infrastructure::dto::websocket::ClientEvent,
    ui::state::AppState,
    usecase::SessionError,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that pushes messages from the rx channel to the WebSocket sender.
///
/// Everything a room sends to this connection flows through here.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, mut receiver) = socket.split();

    // Create a channel for this connection to receive room events
    let (tx, rx) = mpsc::unbounded_channel();
    let connection_id = state.connect_participant_usecase.execute(tx).await;
    tracing::info!("Connection {} opened", connection_id);

    let state_clone = state.clone();

    // Spawn a task to receive events from this connection
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on {}: {}", connection_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    let event = match serde_json::from_str::<ClientEvent>(&text) {
                        Ok(event) => event,
                        Err(e) => {
                            tracing::warn!(
                                "Ignoring malformed event from {}: {}",
                                connection_id,
                                e
                            );
                            continue;
                        }
                    };
                    if let Err(e) = handle_event(&state_clone, connection_id, event).await {
                        tracing::warn!("Ignoring event from {}: {}", connection_id, e);
                    }
                }
                Message::Close(_) => {
                    tracing::info!("Connection {} requested close", connection_id);
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn a task to push room events to this connection
    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    state
        .disconnect_participant_usecase
        .execute(connection_id)
        .await;
    tracing::info!("Connection {} closed", connection_id);
}

/// Dispatches one client event to its UseCase
async fn handle_event(
    state: &AppState,
    connection_id: ConnectionId,
    event: ClientEvent,
) -> Result<(), SessionError> {
    match event {
        ClientEvent::Join {
            room_id,
            display_name,
        } => {
            state
                .join_room_usecase
                .execute(
                    connection_id,
                    RoomId::new(room_id),
                    DisplayName::new(display_name),
                )
                .await
        }
        ClientEvent::SyncCodeRequest {
            code,
            target_connection_id,
        } => {
            state
                .relay_code_usecase
                .sync_code(connection_id, &target_connection_id, code)
                .await
        }
        ClientEvent::CodeChange { room_id, code } => {
            state
                .relay_code_usecase
                .change_code(connection_id, RoomId::new(room_id), code)
                .await
        }
        ClientEvent::ChatMessage {
            display_name, body, ..
        } => state
            .send_message_usecase
            .execute(connection_id, DisplayName::new(display_name), body)
            .await
            .map(|_| ()),
        ClientEvent::UserTyping { display_name } => {
            state
                .notify_typing_usecase
                .execute(connection_id, DisplayName::new(display_name))
                .await
        }
        ClientEvent::Leave => {
            state
                .disconnect_participant_usecase
                .leave(connection_id)
                .await;
            Ok(())
        }
    }
}
