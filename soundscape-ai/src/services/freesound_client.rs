//! Freesound API client
//!
//! Text search against `/search/text/`, sorted by the provider's relevance
//! score. Requests are throttled client-side with a token bucket.

use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::StatusCode;
use serde::Deserialize;
use std::num::NonZeroU32;
use thiserror::Error;

use super::SoundSearch;
use crate::config::FreesoundSettings;
use crate::models::SoundCandidate;

const USER_AGENT: &str = concat!("soundscape-ai/", env!("CARGO_PKG_VERSION"));

/// Fields requested for every search result
pub const SEARCH_FIELDS: &str = "id,name,description,download,previews,duration,license";

/// Freesound client errors
#[derive(Debug, Error)]
pub enum FreesoundError {
    #[error("Freesound API key not configured")]
    MissingCredential,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SoundCandidate>,
}

/// Freesound API client
pub struct FreesoundClient {
    http_client: reqwest::Client,
    rate_limiter: DefaultDirectRateLimiter,
    base_url: String,
    api_key: Option<String>,
}

impl FreesoundClient {
    pub fn new(settings: &FreesoundSettings) -> Result<Self, FreesoundError> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| FreesoundError::NetworkError(e.to_string()))?;

        let rps = NonZeroU32::new(settings.requests_per_second).unwrap_or(NonZeroU32::MIN);

        Ok(Self {
            http_client,
            rate_limiter: RateLimiter::direct(Quota::per_second(rps)),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
        })
    }

    /// Check if API key is configured
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl SoundSearch for FreesoundClient {
    async fn search(
        &self,
        query: &str,
        page_size: usize,
    ) -> Result<Vec<SoundCandidate>, FreesoundError> {
        let token = self
            .api_key
            .as_deref()
            .ok_or(FreesoundError::MissingCredential)?;

        self.rate_limiter.until_ready().await;

        let page_size = page_size.max(1).to_string();
        let params = [
            ("query", query),
            ("fields", SEARCH_FIELDS),
            ("sort", "score"),
            ("page_size", page_size.as_str()),
            ("token", token),
        ];

        tracing::debug!(query = %query, page_size = %page_size, "Querying Freesound API");

        let response = self
            .http_client
            .get(format!("{}/search/text/", self.base_url))
            .query(&params)
            .send()
            .await
            .map_err(|e| FreesoundError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(FreesoundError::InvalidApiKey);
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(FreesoundError::ApiError(status.as_u16(), error_text));
        }

        let search_response: SearchResponse = response
            .json()
            .await
            .map_err(|e| FreesoundError::ParseError(e.to_string()))?;

        tracing::debug!(
            query = %query,
            results = search_response.results.len(),
            "Freesound search complete"
        );

        Ok(search_response.results)
    }

    fn access_token(&self) -> Option<&str> {
        self.api_key.as_deref()
    }
}
