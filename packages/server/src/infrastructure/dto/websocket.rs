//! WebSocket event DTOs.
//!
//! Every frame is a JSON object tagged with `"type"`; payload fields are camelCase.

use serde::{Deserialize, Serialize};

/// A room member as sent in membership snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberInfo {
    pub connection_id: String,
    pub display_name: String,
}

/// A chat message as sent to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessagePayload {
    pub display_name: String,
    pub body: String,
    /// Unix timestamp (milliseconds), stamped by the server
    pub sent_at: i64,
}

/// Events sent by clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum ClientEvent {
    #[serde(rename = "join")]
    Join {
        room_id: String,
        #[serde(default)]
        display_name: String,
    },
    #[serde(rename = "sync-code-request")]
    SyncCodeRequest {
        code: String,
        target_connection_id: String,
    },
    #[serde(rename = "code-change")]
    CodeChange { room_id: String, code: String },
    #[serde(rename = "chat_message")]
    ChatMessage {
        #[serde(default)]
        display_name: String,
        body: String,
        /// Client-side timestamp; ignored, the server stamps its own
        #[serde(default)]
        sent_at: Option<i64>,
    },
    #[serde(rename = "user_typing")]
    UserTyping {
        #[serde(default)]
        display_name: String,
    },
    #[serde(rename = "leave")]
    Leave,
}

/// Events sent by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    /// Membership snapshot, tagged with the connection that just joined
    #[serde(rename = "joined")]
    Joined {
        members: Vec<MemberInfo>,
        display_name: String,
        connection_id: String,
    },
    #[serde(rename = "chat_history")]
    ChatHistory { messages: Vec<ChatMessagePayload> },
    #[serde(rename = "code-change")]
    CodeChange { code: String },
    #[serde(rename = "disconnected")]
    Disconnected {
        connection_id: String,
        display_name: String,
    },
    #[serde(rename = "chat_message")]
    ChatMessage(ChatMessagePayload),
    #[serde(rename = "user_typing")]
    UserTyping { display_name: String },
    #[serde(rename = "user_stopped_typing")]
    UserStoppedTyping { display_name: String },
    /// Asks the recipient to send its document to `target_connection_id`
    #[serde(rename = "sync-code-needed")]
    SyncCodeNeeded { target_connection_id: String },
}
