//! Keyword, search and naming endpoints
//!
//! - `POST /api/keywords`: validate → expand → search (→ rename)
//! - `POST /api/auto-keywords`: keywords from a random style
//! - `POST /api/track-names`: rename caller-supplied sounds

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{require_text, ApiResult};
use crate::models::Sound;
use crate::prompts::INVALID_INPUT_MESSAGE;
use crate::workflow::{
    build_soundscape, generate_style_keywords, log_outcome, pick_style, rename_tracks,
    SoundscapeResult,
};
use crate::AppState;

/// Largest keyword count a caller may ask for
const MAX_AUTO_KEYWORDS: usize = 20;

/// POST /api/keywords request
#[derive(Debug, Deserialize)]
pub struct KeywordsRequest {
    #[serde(rename = "str")]
    pub text: String,
    /// Rename the aggregated sounds before responding
    #[serde(default)]
    pub rename: bool,
}

/// POST /api/keywords success response
#[derive(Debug, Serialize)]
pub struct KeywordsResponse {
    pub success: bool,
    pub keywords: Vec<String>,
    pub sounds: Vec<Sound>,
    pub keywords_fallback: bool,
}

/// POST /api/keywords
///
/// Rejected input is a 200 with `is_valid: false` and example suggestions;
/// no sounds at all is a 404 that still reports the keywords tried.
pub async fn keywords(
    State(state): State<AppState>,
    payload: Result<Json<KeywordsRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(request) = payload?;
    let query = require_text("str", &request.text)?;

    tracing::info!(query = %query, rename = request.rename, "Soundscape requested");

    let result = build_soundscape(
        state.llm.as_ref(),
        &state.aggregator,
        &state.settings,
        query,
        request.rename,
    )
    .await;

    let response = match result {
        SoundscapeResult::Found {
            keywords,
            sounds,
            keywords_fallback,
        } => Json(KeywordsResponse {
            success: true,
            keywords,
            sounds,
            keywords_fallback,
        })
        .into_response(),
        SoundscapeResult::Invalid {
            reason,
            suggestions,
        } => Json(json!({
            "success": false,
            "is_valid": false,
            "message": INVALID_INPUT_MESSAGE,
            "reason": reason,
            "suggestions": suggestions,
        }))
        .into_response(),
        SoundscapeResult::NoSounds { keywords } => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "success": false,
                "keywords": keywords,
                "message": "No sounds found for the generated keywords",
            })),
        )
            .into_response(),
    };

    Ok(response)
}

/// POST /api/auto-keywords request (body optional)
#[derive(Debug, Default, Deserialize)]
pub struct AutoKeywordsRequest {
    #[serde(default)]
    pub count: Option<usize>,
}

/// POST /api/auto-keywords response
#[derive(Debug, Serialize)]
pub struct AutoKeywordsResponse {
    pub success: bool,
    pub style: String,
    pub keywords: Vec<String>,
}

/// POST /api/auto-keywords
pub async fn auto_keywords(
    State(state): State<AppState>,
    body: Option<Json<AutoKeywordsRequest>>,
) -> Json<AutoKeywordsResponse> {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let count = request
        .count
        .filter(|c| *c > 0)
        .unwrap_or(state.settings.keyword_count)
        .min(MAX_AUTO_KEYWORDS);

    let style = pick_style(&mut rand::thread_rng());
    let outcome = generate_style_keywords(state.llm.as_ref(), style, count).await;
    log_outcome("style keywords", &outcome);

    let keywords = outcome
        .into_value()
        .map(|styled| styled.keywords)
        .unwrap_or_default();

    Json(AutoKeywordsResponse {
        success: true,
        style: style.to_string(),
        keywords,
    })
}

/// POST /api/track-names request
#[derive(Debug, Deserialize)]
pub struct TrackNamesRequest {
    pub sounds: Vec<Sound>,
}

/// POST /api/track-names response
#[derive(Debug, Serialize)]
pub struct TrackNamesResponse {
    pub success: bool,
    pub sounds: Vec<Sound>,
    /// Names could not be (fully) generated; originals were kept
    pub degraded: bool,
}

/// POST /api/track-names
pub async fn track_names(
    State(state): State<AppState>,
    payload: Result<Json<TrackNamesRequest>, JsonRejection>,
) -> ApiResult<Json<TrackNamesResponse>> {
    let Json(request) = payload?;
    let count = request.sounds.len();

    let outcome = rename_tracks(
        state.llm.as_ref(),
        request.sounds,
        state.settings.description_max_chars,
    )
    .await;
    log_outcome("track naming", &outcome);

    let degraded = !outcome.is_success();
    let sounds = outcome.into_value().unwrap_or_default();
    tracing::info!(sounds = count, degraded, "Track names generated");

    Ok(Json(TrackNamesResponse {
        success: true,
        sounds,
        degraded,
    }))
}

/// Build soundscape routes
pub fn soundscape_routes() -> Router<AppState> {
    Router::new()
        .route("/api/keywords", post(keywords))
        .route("/api/auto-keywords", post(auto_keywords))
        .route("/api/track-names", post(track_names))
}
