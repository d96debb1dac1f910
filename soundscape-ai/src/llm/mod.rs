//! LLM completion abstraction
//!
//! The service only ever sends one free-text prompt and reads back free text.
//! Any structure (objects, string lists) is recovered afterwards by
//! [`structured`], so the [`LlmClient`] seam stays as narrow as possible and
//! test doubles only need to return canned strings.

pub mod mistral;
pub mod structured;

use async_trait::async_trait;
use thiserror::Error;

pub use mistral::MistralClient;
pub use structured::{
    complete_object, complete_string_list, complete_structured, parse_object, parse_string_list,
    sanitize, ExpectedShape, ListParseMethod, ParsedList, StructuredError, StructuredValue,
};

/// Errors that can occur when talking to the completion service
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM API key not configured")]
    MissingCredential,

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Completion contained no text")]
    EmptyCompletion,

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Text completion service
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Model identifier sent with every request
    fn model(&self) -> &str;

    /// Send a single user prompt, return the model's raw text answer
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}
