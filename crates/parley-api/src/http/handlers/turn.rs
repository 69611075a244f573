//! Conversational turn handlers.
//!
//! Endpoints:
//! - POST /api/v1/bootstrap - establish a session, return root options
//! - POST /api/v1/menu      - advance the scripted menu/FAQ state machine
//! - POST /api/v1/message   - free-text turn (grounded generation)
//! - POST /api/v1/voice     - free-text alias echoing the transcribed text
//! - POST /api/v1/reset     - clear state, mint a fresh session
//! - GET  /api/v1/history   - recent persisted history (debug surface)

use std::time::Instant;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use parley_core::engine::{MessageReply, TurnReply, EMPTY_INPUT_REPLY};
use parley_types::chat::{ChatMessage, SessionId};
use parley_types::menu::NavigationPath;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct BootstrapRequest {
    #[serde(default)]
    pub session_id: Option<SessionId>,
}

#[derive(Debug, Deserialize)]
pub struct MenuRequest {
    #[serde(default)]
    pub session_id: Option<SessionId>,
    pub option: String,
    #[serde(default)]
    pub path: NavigationPath,
}

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    #[serde(default)]
    pub session_id: Option<SessionId>,
    #[serde(default)]
    pub input: String,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub session_id: SessionId,
    #[serde(default = "default_history_limit")]
    pub limit: usize,
}

fn default_history_limit() -> usize {
    50
}

/// Voice turns echo the transcribed text back alongside the response.
#[derive(Debug, Serialize)]
pub struct VoiceReply {
    pub session_id: SessionId,
    pub response: String,
    pub transcribed_text: String,
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct HistoryReply {
    pub session_id: SessionId,
    pub messages: Vec<ChatMessage>,
}

/// POST /api/v1/bootstrap - establish a session and return the root menu.
pub async fn bootstrap(
    State(state): State<AppState>,
    Json(request): Json<BootstrapRequest>,
) -> Result<Json<ApiResponse<TurnReply>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let reply = state.engine.bootstrap(request.session_id).await;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(reply, request_id, elapsed)))
}

/// POST /api/v1/menu - one scripted transition.
pub async fn advance_menu(
    State(state): State<AppState>,
    Json(request): Json<MenuRequest>,
) -> Result<Json<ApiResponse<TurnReply>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let reply = state
        .engine
        .advance_menu(request.session_id, &request.option, &request.path)
        .await;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(reply, request_id, elapsed)))
}

/// POST /api/v1/message - free-text turn.
pub async fn message(
    State(state): State<AppState>,
    Json(request): Json<MessageRequest>,
) -> Result<Json<ApiResponse<MessageReply>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let reply = state.engine.free_text(request.session_id, &request.input).await;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(reply, request_id, elapsed)))
}

/// POST /api/v1/voice - free-text alias for transcribed voice input.
pub async fn voice(
    State(state): State<AppState>,
    Json(request): Json<MessageRequest>,
) -> Result<Json<ApiResponse<VoiceReply>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let transcribed = request.input.trim().to_string();
    let reply = state.engine.free_text(request.session_id, &transcribed).await;

    let success = reply.response != EMPTY_INPUT_REPLY;
    let voice_reply = VoiceReply {
        session_id: reply.session_id,
        response: reply.response,
        transcribed_text: transcribed,
        success,
    };

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(voice_reply, request_id, elapsed)))
}

/// POST /api/v1/reset - clear navigation state and mint a fresh session.
pub async fn reset(
    State(state): State<AppState>,
    Json(request): Json<BootstrapRequest>,
) -> Result<Json<ApiResponse<TurnReply>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let reply = state.engine.reset(request.session_id).await;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(reply, request_id, elapsed)))
}

/// GET /api/v1/history - recent persisted messages for a session.
pub async fn history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<ApiResponse<HistoryReply>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let messages = state.engine.history(&query.session_id, query.limit).await;
    let reply = HistoryReply {
        session_id: query.session_id,
        messages,
    };

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(reply, request_id, elapsed)))
}
