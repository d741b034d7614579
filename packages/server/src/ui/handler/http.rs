//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use kyodo_shared::time::timestamp_to_rfc3339;

use crate::{
    domain::{CompileError, RoomId},
    infrastructure::dto::http::{
        CompileErrorDto, CompileRequestDto, CompileResponseDto, HealthDto, RoomStatsDto,
    },
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthDto> {
    let status = state.get_room_stats_usecase.server_status().await;
    Json(HealthDto {
        status: "ok".to_string(),
        timestamp: timestamp_to_rfc3339(state.clock.now_millis()),
        connected_users: status.connected_users,
        active_rooms: status.active_rooms,
    })
}

/// Get statistics of a room (an unknown room reports zero users)
pub async fn room_stats(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Json<RoomStatsDto> {
    let stats = state
        .get_room_stats_usecase
        .execute(RoomId::new(room_id))
        .await;
    // Domain Model から DTO への変換
    Json(RoomStatsDto::from(stats))
}

/// Compile and run code through the execution service
///
/// Bodies that are not a JSON compile request are answered like a request with
/// missing fields.
pub async fn compile(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CompileRequestDto>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::warn!("Rejected compile request body: {}", rejection.body_text());
            return compile_error_response(&CompileError::InvalidRequest);
        }
    };

    match state
        .compile_code_usecase
        .execute(request.code, request.language)
        .await
    {
        Ok(output) => Json(CompileResponseDto::from(output)).into_response(),
        Err(e) => compile_error_response(&e),
    }
}

fn compile_error_response(error: &CompileError) -> Response {
    (error_status(error), Json(CompileErrorDto::from(error))).into_response()
}

fn error_status(error: &CompileError) -> StatusCode {
    match error {
        CompileError::InvalidRequest | CompileError::UnsupportedLanguage(_) => {
            StatusCode::BAD_REQUEST
        }
        CompileError::Timeout => StatusCode::REQUEST_TIMEOUT,
        CompileError::Service { status, .. } => {
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
        }
        CompileError::Connectivity(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
