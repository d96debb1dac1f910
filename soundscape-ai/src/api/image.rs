//! Illustrative image endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::{require_text, ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ImageRequest {
    #[serde(rename = "str")]
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct ImageResponse {
    pub success: bool,
    pub image_url: String,
}

/// POST /api/get-image
pub async fn get_image(
    State(state): State<AppState>,
    payload: Result<Json<ImageRequest>, JsonRejection>,
) -> ApiResult<Json<ImageResponse>> {
    let Json(request) = payload?;
    let query = require_text("str", &request.query)?;

    let image_url = state
        .image_search
        .first_image_url(query)
        .await
        .map_err(|e| ApiError::Upstream(e.to_string()))?
        .ok_or_else(|| ApiError::NotFound(format!("No image found for '{query}'")))?;

    tracing::debug!(query = %query, image_url = %image_url, "Image found");

    Ok(Json(ImageResponse {
        success: true,
        image_url,
    }))
}

pub fn image_routes() -> Router<AppState> {
    Router::new().route("/api/get-image", post(get_image))
}
