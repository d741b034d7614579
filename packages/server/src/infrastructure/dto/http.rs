//! HTTP API request/response DTOs.

use serde::{Deserialize, Serialize};

/// Response body of `GET /health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthDto {
    pub status: String,
    /// RFC 3339
    pub timestamp: String,
    pub connected_users: usize,
    pub active_rooms: usize,
}

/// Response body of `GET /rooms/{room_id}/stats`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomStatsDto {
    pub room_id: String,
    pub connected_users: usize,
    pub users: Vec<String>,
    pub message_count: usize,
}

/// Request body of `POST /compile`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompileRequestDto {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

/// Compilation status reported to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompilationStatus {
    Success,
    Error,
}

/// Response body of a `POST /compile` that reached the execution service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileResponseDto {
    pub output_text: String,
    pub compilation_status: CompilationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_time: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_mock: bool,
}

/// Error body of a failed `POST /compile`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileErrorDto {
    pub error: String,
    pub error_kind: String,
}
