//! Test Helper Utilities
//!
//! In-process stand-ins for the completion, audio-search and image-search
//! services, plus router plumbing shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use soundscape_ai::config::PipelineSettings;
use soundscape_ai::llm::{LlmClient, LlmError};
use soundscape_ai::models::SoundCandidate;
use soundscape_ai::services::{FreesoundError, ImageSearch, SoundSearch, UnsplashError};
use soundscape_ai::{build_router, AppState};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

pub const TEST_TOKEN: &str = "test-token";

// ============================================================================
// Completion service
// ============================================================================

/// Which prompt builder produced a prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptKind {
    Validation,
    Keywords,
    StyleKeywords,
    TrackNames,
    Description,
    Chat,
}

pub fn prompt_kind(prompt: &str) -> PromptKind {
    if prompt.contains("sound-related input validator") {
        PromptKind::Validation
    } else if prompt.contains("sound design keyword generator") {
        PromptKind::Keywords
    } else if prompt.contains("creative sound designer") {
        PromptKind::StyleKeywords
    } else if prompt.contains("sound naming expert") {
        PromptKind::TrackNames
    } else if prompt.contains("specialized description generator") {
        PromptKind::Description
    } else {
        PromptKind::Chat
    }
}

/// Canned answers per prompt kind; unscripted kinds fail with a network error
#[derive(Default)]
pub struct FakeLlm {
    answers: HashMap<PromptKind, Result<String, String>>,
    pub prompts: Mutex<Vec<String>>,
}

impl FakeLlm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, kind: PromptKind, text: &str) -> Self {
        self.answers.insert(kind, Ok(text.to_string()));
        self
    }

    pub fn fail(mut self, kind: PromptKind, message: &str) -> Self {
        self.answers.insert(kind, Err(message.to_string()));
        self
    }

    pub fn calls(&self, kind: PromptKind) -> usize {
        self.prompts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| prompt_kind(p) == kind)
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmClient for FakeLlm {
    fn model(&self) -> &str {
        "fake-model"
    }

    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.answers.get(&prompt_kind(prompt)) {
            Some(Ok(text)) => Ok(text.clone()),
            Some(Err(message)) => Err(LlmError::Network(message.clone())),
            None => Err(LlmError::Network("no scripted answer".to_string())),
        }
    }
}

// ============================================================================
// Audio search
// ============================================================================

/// Returns `default_count` generated candidates per query unless scripted
pub struct FakeSoundSearch {
    default_count: usize,
    scripted: HashMap<String, Vec<SoundCandidate>>,
    failing: HashSet<String>,
    pub queries: Mutex<Vec<(String, usize)>>,
}

impl FakeSoundSearch {
    pub fn new(default_count: usize) -> Self {
        Self {
            default_count,
            scripted: HashMap::new(),
            failing: HashSet::new(),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn with_results(mut self, query: &str, results: Vec<SoundCandidate>) -> Self {
        self.scripted.insert(query.to_string(), results);
        self
    }

    pub fn failing_for(mut self, query: &str) -> Self {
        self.failing.insert(query.to_string());
        self
    }

    pub fn queried(&self) -> Vec<String> {
        self.queries
            .lock()
            .unwrap()
            .iter()
            .map(|(q, _)| q.clone())
            .collect()
    }
}

/// Candidate with a download reference, named after `label`
pub fn candidate(id: u64, label: &str) -> SoundCandidate {
    SoundCandidate {
        id: Some(id),
        name: Some(format!("{label}.wav")),
        description: Some(format!("Field recording of {label}")),
        download: Some(format!("https://freesound.org/apiv2/sounds/{id}/download/")),
        previews: None,
        duration: Some(10.0),
        license: Some("http://creativecommons.org/publicdomain/zero/1.0/".to_string()),
    }
}

#[async_trait]
impl SoundSearch for FakeSoundSearch {
    async fn search(
        &self,
        query: &str,
        page_size: usize,
    ) -> Result<Vec<SoundCandidate>, FreesoundError> {
        self.queries
            .lock()
            .unwrap()
            .push((query.to_string(), page_size));

        if self.failing.contains(query) {
            return Err(FreesoundError::NetworkError("connection reset".to_string()));
        }
        if let Some(results) = self.scripted.get(query) {
            return Ok(results.clone());
        }

        let base = query.len() as u64 * 100;
        Ok((0..self.default_count as u64)
            .map(|i| candidate(base + i, &format!("{query} {i}")))
            .collect())
    }

    fn access_token(&self) -> Option<&str> {
        Some(TEST_TOKEN)
    }
}

// ============================================================================
// Image search
// ============================================================================

pub struct FakeImageSearch {
    pub result: Result<Option<String>, String>,
}

impl FakeImageSearch {
    pub fn found(url: &str) -> Self {
        Self {
            result: Ok(Some(url.to_string())),
        }
    }

    pub fn empty() -> Self {
        Self { result: Ok(None) }
    }

    pub fn failing() -> Self {
        Self {
            result: Err("upstream unavailable".to_string()),
        }
    }
}

#[async_trait]
impl ImageSearch for FakeImageSearch {
    async fn first_image_url(&self, _query: &str) -> Result<Option<String>, UnsplashError> {
        self.result
            .clone()
            .map_err(UnsplashError::NetworkError)
    }
}

// ============================================================================
// Router plumbing
// ============================================================================

pub fn test_app(
    llm: Arc<FakeLlm>,
    search: Arc<FakeSoundSearch>,
    images: Arc<FakeImageSearch>,
) -> Router {
    let state = AppState::new(llm, search, images, PipelineSettings::default());
    build_router(state)
}

pub async fn post_json(app: Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}
