//! Mistral chat-completions client
//!
//! POSTs `{model, messages: [{role: "user", content}]}` to
//! `<base_url>/chat/completions` with a bearer credential and returns the text
//! of the first choice.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{LlmClient, LlmError};
use crate::config::LlmSettings;

const USER_AGENT: &str = concat!("soundscape-ai/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<MessageContent>,
}

/// Newer models may answer with a list of typed chunks instead of a string
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Chunks(Vec<ContentChunk>),
}

#[derive(Debug, Deserialize)]
struct ContentChunk {
    #[serde(default)]
    text: Option<String>,
}

impl MessageContent {
    fn into_text(self) -> String {
        match self {
            MessageContent::Text(text) => text,
            MessageContent::Chunks(chunks) => chunks
                .into_iter()
                .filter_map(|c| c.text)
                .collect::<Vec<_>>()
                .join(""),
        }
    }
}

/// Mistral API client
pub struct MistralClient {
    http_client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl MistralClient {
    pub fn new(settings: &LlmSettings) -> Result<Self, LlmError> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| LlmError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            api_key: settings.api_key.as_deref().map(normalize_api_key),
        })
    }

    /// Check if API key is configured
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Credentials are sometimes stored with their "Bearer " prefix already applied
fn normalize_api_key(key: &str) -> String {
    let key = key.trim();
    key.strip_prefix("Bearer ").unwrap_or(key).trim().to_string()
}

#[async_trait]
impl LlmClient for MistralClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingCredential)?;

        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        debug!(
            model = %self.model,
            prompt_chars = prompt.len(),
            "Sending completion request to Mistral"
        );

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: "Invalid API key".to_string(),
            });
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        let text = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(MessageContent::into_text)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(LlmError::EmptyCompletion)?;

        debug!(completion_chars = text.len(), "Received completion from Mistral");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(api_key: Option<&str>) -> LlmSettings {
        LlmSettings {
            api_key: api_key.map(str::to_string),
            ..LlmSettings::default()
        }
    }

    #[test]
    fn test_bearer_prefix_is_stripped() {
        assert_eq!(normalize_api_key("Bearer abc123"), "abc123");
        assert_eq!(normalize_api_key("  abc123 "), "abc123");
    }

    #[test]
    fn test_is_configured() {
        assert!(MistralClient::new(&settings(Some("key"))).unwrap().is_configured());
        assert!(!MistralClient::new(&settings(None)).unwrap().is_configured());
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_request() {
        let client = MistralClient::new(&settings(None)).unwrap();
        let err = client.complete("hello").await.unwrap_err();
        assert!(matches!(err, LlmError::MissingCredential));
    }

    #[test]
    fn test_chunked_content_is_joined() {
        let json = r#"{"choices":[{"message":{"content":[{"type":"text","text":"[\"a\", "},{"type":"text","text":"\"b\"]"}]}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(json).unwrap();
        let content = parsed.choices.into_iter().next().unwrap().message.content.unwrap();
        assert_eq!(content.into_text(), r#"["a", "b"]"#);
    }
}
