use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;

use super::errors::ApiError;
use super::models::*;
use super::state::SharedState;

// =========================================================================
// Health
// =========================================================================

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

// =========================================================================
// Chat
// =========================================================================

/// POST /chat
///
/// Always answers 200 once the body is valid; provider failures are folded
/// into the answer text by the chat service.
pub async fn chat(
    State(state): State<SharedState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(input) = payload?;

    tracing::info!(
        city = %input.city,
        messages = input.messages.len(),
        "chat request"
    );

    let answer = state.chat.answer(&input.city, &input.messages).await;
    Ok(Json(ChatResponse { answer }))
}

// =========================================================================
// Tests
// =========================================================================
