//! soundscape-ai library interface
//!
//! Exposes the router, workflow steps and upstream seams for integration
//! testing.

pub mod api;
pub mod config;
pub mod error;
pub mod llm;
pub mod models;
pub mod prompts;
pub mod services;
pub mod workflow;

pub use crate::error::{ApiError, ApiResult};

use axum::http::{header, Method};
use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::PipelineSettings;
use crate::llm::LlmClient;
use crate::services::{ImageSearch, SoundAggregator, SoundSearch};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Completion service used by every LLM-backed step
    pub llm: Arc<dyn LlmClient>,
    /// Audio-clip search provider
    pub sound_search: Arc<dyn SoundSearch>,
    /// Per-keyword fan-out over `sound_search`
    pub aggregator: Arc<SoundAggregator>,
    /// Image search provider
    pub image_search: Arc<dyn ImageSearch>,
    pub settings: PipelineSettings,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        sound_search: Arc<dyn SoundSearch>,
        image_search: Arc<dyn ImageSearch>,
        settings: PipelineSettings,
    ) -> Self {
        let aggregator = Arc::new(SoundAggregator::new(
            sound_search.clone(),
            settings.sounds_per_keyword,
        ));
        Self {
            llm,
            sound_search,
            aggregator,
            image_search,
            settings,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .merge(api::health_routes())
        .merge(api::soundscape_routes())
        .merge(api::sound_routes())
        .merge(api::description_routes())
        .merge(api::image_routes())
        .merge(api::chat_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
