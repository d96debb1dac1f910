//! Soundscape description
//!
//! Prose target, so the answer must parse strictly as `{"description": ...}`.
//! There is no quoted-substring fallback here.

use serde_json::Value;

use crate::llm::{complete_object, LlmClient};
use crate::models::StepOutcome;
use crate::prompts::description_prompt;

/// A 3-4 sentence paragraph for comma-joined track names
pub async fn generate_description(llm: &dyn LlmClient, track_names: &str) -> StepOutcome<String> {
    let map = match complete_object(llm, &description_prompt(track_names)).await {
        Ok(map) => map,
        Err(e) => return StepOutcome::failed(e.to_string()),
    };

    match map.get("description").and_then(Value::as_str).map(str::trim) {
        Some(description) if !description.is_empty() => {
            StepOutcome::Success(description.to_string())
        }
        _ => StepOutcome::failed("answer has no description field"),
    }
}
