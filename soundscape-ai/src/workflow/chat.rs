//! Product assistant chat

use serde_json::Value;

use crate::llm::{parse_object, sanitize, LlmClient};
use crate::models::StepOutcome;
use crate::prompts::chat_prompt;

/// Answer a free-form question about the product
///
/// The model is asked for `{"response": ...}`. If it answers in plain prose
/// instead, the sanitized text is used as the answer.
pub async fn answer(llm: &dyn LlmClient, question: &str) -> StepOutcome<String> {
    let raw = match llm.complete(&chat_prompt(question)).await {
        Ok(raw) => raw,
        Err(e) => return StepOutcome::failed(e.to_string()),
    };

    if let Ok(map) = parse_object(&raw) {
        if let Some(response) = map.get("response").and_then(Value::as_str) {
            let response = response.trim();
            if !response.is_empty() {
                return StepOutcome::Success(response.to_string());
            }
        }
    }

    let text = sanitize(&raw);
    if text.is_empty() {
        StepOutcome::failed("empty chat answer")
    } else {
        StepOutcome::degraded(text, "chat answer was not a response object")
    }
}
