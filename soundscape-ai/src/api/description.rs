//! Soundscape description endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::{require_text, ApiError, ApiResult};
use crate::workflow::{generate_description, log_outcome};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct DescriptionRequest {
    /// Comma-joined track names
    #[serde(rename = "str")]
    pub track_names: String,
}

#[derive(Debug, Serialize)]
pub struct DescriptionResponse {
    pub success: bool,
    pub description: String,
}

/// POST /api/description
///
/// An empty result is a generation failure (500), not a not-found.
pub async fn describe(
    State(state): State<AppState>,
    payload: Result<Json<DescriptionRequest>, JsonRejection>,
) -> ApiResult<Json<DescriptionResponse>> {
    let Json(request) = payload?;
    let track_names = require_text("str", &request.track_names)?;

    let outcome = generate_description(state.llm.as_ref(), track_names).await;
    log_outcome("description", &outcome);

    let description = outcome
        .into_value()
        .ok_or_else(|| ApiError::Internal("Failed to generate description".to_string()))?;

    Ok(Json(DescriptionResponse {
        success: true,
        description,
    }))
}

pub fn description_routes() -> Router<AppState> {
    Router::new().route("/api/description", post(describe))
}
