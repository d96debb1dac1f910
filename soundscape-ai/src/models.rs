//! Request-scoped data model
//!
//! Nothing here is persisted; every value lives for one HTTP request.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Preview rendition surfaced as `preview_url`
pub const HQ_PREVIEW_KEY: &str = "preview-hq-mp3";

/// One raw record from the audio-search provider
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SoundCandidate {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Download reference (needs an access token to be fetched)
    #[serde(default)]
    pub download: Option<String>,
    /// Preview renditions keyed by quality, e.g. `preview-hq-mp3`
    #[serde(default)]
    pub previews: Option<HashMap<String, String>>,
    /// Seconds
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub license: Option<String>,
}

impl SoundCandidate {
    pub fn hq_preview(&self) -> Option<&str> {
        self.previews
            .as_ref()
            .and_then(|p| p.get(HQ_PREVIEW_KEY))
            .map(String::as_str)
            .filter(|url| !url.trim().is_empty())
    }
}

/// Sound record returned to callers
///
/// Also accepted back from callers by the rename operation, so unknown fields
/// are kept in `extra` and written back out untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Sound {
    /// 1-based position in the aggregate
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub sound_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub freesound_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    /// Provider's original display name, kept after renaming
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freesound_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Accept either a JSON string or a number for id-like fields
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Outcome of the topical-relevance check
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationVerdict {
    Valid,
    Invalid {
        reason: String,
        suggestions: Vec<String>,
    },
}

/// Keywords generated from a randomly picked style
#[derive(Debug, Clone, PartialEq)]
pub struct StyledKeywords {
    pub style: String,
    pub keywords: Vec<String>,
}

/// Result of an LLM-facing step
///
/// Steps never raise to their caller. `Degraded` carries the safe default
/// (or partially recovered value) actually returned, `Failed` means there is
/// no usable value at all.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome<T> {
    Success(T),
    Degraded { value: T, cause: String },
    Failed { cause: String },
}

impl<T> StepOutcome<T> {
    pub fn degraded(value: T, cause: impl Into<String>) -> Self {
        StepOutcome::Degraded {
            value,
            cause: cause.into(),
        }
    }

    pub fn failed(cause: impl Into<String>) -> Self {
        StepOutcome::Failed {
            cause: cause.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, StepOutcome::Success(_))
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, StepOutcome::Degraded { .. })
    }

    /// Degradation or failure cause, if any
    pub fn cause(&self) -> Option<&str> {
        match self {
            StepOutcome::Success(_) => None,
            StepOutcome::Degraded { cause, .. } | StepOutcome::Failed { cause } => Some(cause),
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            StepOutcome::Success(value) | StepOutcome::Degraded { value, .. } => Some(value),
            StepOutcome::Failed { .. } => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            StepOutcome::Success(value) | StepOutcome::Degraded { value, .. } => Some(value),
            StepOutcome::Failed { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sound_preserves_unknown_fields() {
        let input = json!({
            "sound_number": 2,
            "freesound_id": "1234",
            "name": "rain_loop_01.wav",
            "sound_url": "https://example.org/dl?token=t",
            "volume": 0.7,
            "tags": ["rain"]
        });

        let sound: Sound = serde_json::from_value(input).unwrap();
        assert_eq!(sound.sound_number.as_deref(), Some("2"));
        assert_eq!(sound.freesound_id.as_deref(), Some("1234"));
        assert_eq!(sound.extra.get("volume"), Some(&json!(0.7)));

        let output = serde_json::to_value(&sound).unwrap();
        assert_eq!(output["tags"], json!(["rain"]));
        assert!(output.get("freesound_name").is_none());
    }

    #[test]
    fn test_hq_preview() {
        let mut previews = HashMap::new();
        previews.insert(HQ_PREVIEW_KEY.to_string(), "https://cdn/x-hq.mp3".to_string());
        previews.insert("preview-lq-mp3".to_string(), "https://cdn/x-lq.mp3".to_string());
        let candidate = SoundCandidate {
            previews: Some(previews),
            ..Default::default()
        };
        assert_eq!(candidate.hq_preview(), Some("https://cdn/x-hq.mp3"));
        assert_eq!(SoundCandidate::default().hq_preview(), None);
    }

    #[test]
    fn test_step_outcome_accessors() {
        let ok: StepOutcome<u8> = StepOutcome::Success(1);
        assert_eq!(ok.cause(), None);
        assert_eq!(ok.into_value(), Some(1));

        let degraded = StepOutcome::degraded(0u8, "parse failed");
        assert!(degraded.is_degraded());
        assert_eq!(degraded.cause(), Some("parse failed"));
        assert_eq!(degraded.value(), Some(&0));

        let failed: StepOutcome<u8> = StepOutcome::failed("timeout");
        assert_eq!(failed.into_value(), None);
    }
}
