//! Conversion logic between DTOs and domain entities.

use crate::domain::{ChatMessage, CompileError, CompileOutput, Member, RoomEvent, RoomStats};
use crate::infrastructure::dto::{http, websocket as dto};

// ========================================
// Domain Entity → DTO
// ========================================

impl From<Member> for dto::MemberInfo {
    fn from(member: Member) -> Self {
        Self {
            connection_id: member.connection_id.to_string(),
            display_name: member.display_name.into_string(),
        }
    }
}

impl From<ChatMessage> for dto::ChatMessagePayload {
    fn from(message: ChatMessage) -> Self {
        Self {
            display_name: message.display_name.into_string(),
            body: message.body,
            sent_at: message.sent_at.value(),
        }
    }
}

impl From<RoomEvent> for dto::ServerEvent {
    fn from(event: RoomEvent) -> Self {
        match event {
            RoomEvent::Joined { members, joined } => Self::Joined {
                members: members.into_iter().map(Into::into).collect(),
                display_name: joined.display_name.into_string(),
                connection_id: joined.connection_id.to_string(),
            },
            RoomEvent::ChatHistory(messages) => Self::ChatHistory {
                messages: messages.into_iter().map(Into::into).collect(),
            },
            RoomEvent::CodeChanged { code } => Self::CodeChange { code },
            RoomEvent::Departed(member) => Self::Disconnected {
                connection_id: member.connection_id.to_string(),
                display_name: member.display_name.into_string(),
            },
            RoomEvent::ChatPosted(message) => Self::ChatMessage(message.into()),
            RoomEvent::TypingStarted(name) => Self::UserTyping {
                display_name: name.into_string(),
            },
            RoomEvent::TypingStopped(name) => Self::UserStoppedTyping {
                display_name: name.into_string(),
            },
            RoomEvent::SyncNeeded { target } => Self::SyncCodeNeeded {
                target_connection_id: target.to_string(),
            },
        }
    }
}

impl From<RoomStats> for http::RoomStatsDto {
    fn from(stats: RoomStats) -> Self {
        Self {
            room_id: stats.room_id.into_string(),
            connected_users: stats.users.len(),
            users: stats.users.into_iter().map(|u| u.into_string()).collect(),
            message_count: stats.message_count,
        }
    }
}

impl From<CompileOutput> for http::CompileResponseDto {
    fn from(output: CompileOutput) -> Self {
        Self {
            output_text: output.output_text,
            compilation_status: if output.succeeded {
                http::CompilationStatus::Success
            } else {
                http::CompilationStatus::Error
            },
            error_text: output.error_text,
            memory: output.memory,
            cpu_time: output.cpu_time,
            is_mock: output.is_mock,
        }
    }
}

impl From<&CompileError> for http::CompileErrorDto {
    fn from(error: &CompileError) -> Self {
        let message = match error {
            CompileError::Service { message, .. } => message.clone(),
            other => other.to_string(),
        };
        Self {
            error: message,
            error_kind: error.kind().to_string(),
        }
    }
}
