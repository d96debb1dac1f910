//! Topical-relevance check
//!
//! Lenient by construction: only an explicit `"is_valid": false` rejects the
//! input. Anything else (transport error, malformed answer, missing field)
//! lets the request through.

use serde_json::Value;

use crate::llm::{complete_object, LlmClient};
use crate::models::{StepOutcome, ValidationVerdict};
use crate::prompts::{validation_prompt, INVALID_INPUT_MESSAGE, SUGGESTIONS};

/// Classify whether `user_text` plausibly describes a soundscape
pub async fn validate_input(llm: &dyn LlmClient, user_text: &str) -> StepOutcome<ValidationVerdict> {
    let map = match complete_object(llm, &validation_prompt(user_text)).await {
        Ok(map) => map,
        Err(e) => return StepOutcome::degraded(ValidationVerdict::Valid, e.to_string()),
    };

    match map.get("is_valid") {
        Some(Value::Bool(true)) => StepOutcome::Success(ValidationVerdict::Valid),
        Some(Value::Bool(false)) => {
            let reason = map
                .get("reason")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .unwrap_or(INVALID_INPUT_MESSAGE)
                .to_string();
            StepOutcome::Success(ValidationVerdict::Invalid {
                reason,
                suggestions: SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
            })
        }
        _ => StepOutcome::degraded(
            ValidationVerdict::Valid,
            "validation answer has no boolean is_valid field",
        ),
    }
}
