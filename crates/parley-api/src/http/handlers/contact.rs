//! Contact submission handler.
//!
//! POST /api/v1/contact - persist contact details and acknowledge with the
//! fixed thank-you message.

use std::time::Instant;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use parley_core::engine::ContactReply;
use parley_types::chat::{ContactInfo, SessionId};

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub session_id: Option<SessionId>,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub issue: Option<String>,
}

/// POST /api/v1/contact - submit contact details for a callback.
pub async fn submit_contact(
    State(state): State<AppState>,
    Json(request): Json<ContactRequest>,
) -> Result<Json<ApiResponse<ContactReply>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    if request.name.trim().is_empty() || request.email.trim().is_empty() {
        return Err(AppError::Validation(
            "contact name and email are required".to_string(),
        ));
    }

    let contact = ContactInfo {
        name: request.name,
        email: request.email,
        phone: request.phone,
        issue: request.issue,
    };
    let reply = state.engine.submit_contact(request.session_id, &contact).await;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(reply, request_id, elapsed)))
}
