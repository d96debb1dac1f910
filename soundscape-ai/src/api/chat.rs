//! Product assistant endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::{require_text, ApiError, ApiResult};
use crate::models::StepOutcome;
use crate::workflow::{answer, log_outcome};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub success: bool,
    pub response: String,
}

/// POST /api/chat
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> ApiResult<Json<ChatResponse>> {
    let Json(request) = payload?;
    let question = require_text("message", &request.message)?;

    let outcome = answer(state.llm.as_ref(), question).await;
    log_outcome("chat", &outcome);

    match outcome {
        StepOutcome::Success(response) | StepOutcome::Degraded { value: response, .. } => {
            Ok(Json(ChatResponse {
                success: true,
                response,
            }))
        }
        StepOutcome::Failed { cause } => Err(ApiError::Upstream(cause)),
    }
}

pub fn chat_routes() -> Router<AppState> {
    Router::new().route("/api/chat", post(chat))
}
