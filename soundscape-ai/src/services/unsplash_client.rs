//! Unsplash API client
//!
//! One illustrative image per soundscape: first result of
//! `/search/photos?page=1&per_page=1`, "small" rendition.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use super::ImageSearch;
use crate::config::UnsplashSettings;

const USER_AGENT: &str = concat!("soundscape-ai/", env!("CARGO_PKG_VERSION"));

/// Unsplash client errors
#[derive(Debug, Error)]
pub enum UnsplashError {
    #[error("Unsplash access key not configured")]
    MissingCredential,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid access key")]
    InvalidAccessKey,

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

#[derive(Debug, Deserialize)]
struct PhotoSearchResponse {
    #[serde(default)]
    results: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    urls: PhotoUrls,
}

#[derive(Debug, Deserialize)]
struct PhotoUrls {
    #[serde(default)]
    small: Option<String>,
}

impl PhotoSearchResponse {
    fn first_small_url(self) -> Option<String> {
        self.results
            .into_iter()
            .next()
            .and_then(|photo| photo.urls.small)
            .filter(|url| !url.trim().is_empty())
    }
}

/// Unsplash API client
pub struct UnsplashClient {
    http_client: reqwest::Client,
    base_url: String,
    access_key: Option<String>,
}

impl UnsplashClient {
    pub fn new(settings: &UnsplashSettings) -> Result<Self, UnsplashError> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| UnsplashError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            access_key: settings.access_key.clone(),
        })
    }
}

#[async_trait]
impl ImageSearch for UnsplashClient {
    async fn first_image_url(&self, query: &str) -> Result<Option<String>, UnsplashError> {
        let access_key = self
            .access_key
            .as_deref()
            .ok_or(UnsplashError::MissingCredential)?;

        tracing::debug!(query = %query, "Querying Unsplash API");

        // reqwest URL-encodes query parameters
        let response = self
            .http_client
            .get(format!("{}/search/photos", self.base_url))
            .query(&[
                ("query", query),
                ("page", "1"),
                ("per_page", "1"),
                ("client_id", access_key),
            ])
            .send()
            .await
            .map_err(|e| UnsplashError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(UnsplashError::InvalidAccessKey);
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(UnsplashError::ApiError(status.as_u16(), error_text));
        }

        let search: PhotoSearchResponse = response
            .json()
            .await
            .map_err(|e| UnsplashError::ParseError(e.to_string()))?;

        Ok(search.first_small_url())
    }
}
