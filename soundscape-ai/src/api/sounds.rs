//! Single-sound search endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::{require_text, ApiError, ApiResult};
use crate::models::Sound;
use crate::workflow::find_single_sound;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SoundSearchRequest {
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct SoundSearchResponse {
    pub success: bool,
    pub sound: Sound,
}

/// POST /api/sounds/search
///
/// Top match only, renamed when the model cooperates.
pub async fn search_sound(
    State(state): State<AppState>,
    payload: Result<Json<SoundSearchRequest>, JsonRejection>,
) -> ApiResult<Json<SoundSearchResponse>> {
    let Json(request) = payload?;
    let query = require_text("query", &request.query)?;

    let sound = find_single_sound(
        state.llm.as_ref(),
        state.sound_search.as_ref(),
        query,
        state.settings.description_max_chars,
    )
    .await
    .map_err(|e| ApiError::Upstream(e.to_string()))?
    .ok_or_else(|| ApiError::NotFound(format!("No sound found for '{query}'")))?;

    Ok(Json(SoundSearchResponse {
        success: true,
        sound,
    }))
}

pub fn sound_routes() -> Router<AppState> {
    Router::new().route("/api/sounds/search", post(search_sound))
}
