//! Structured output recovery from free-text completions
//!
//! Model output is not a reliable grammar. Recovery happens in two tiers:
//! 1. [`sanitize`] strips markdown fences around the payload
//! 2. strict JSON parse of the sanitized text (or of its outermost
//!    bracketed span when prose surrounds it)
//!
//! For string lists a third tier applies: when strict parsing fails, every
//! double-quoted substring of the raw completion is collected, and used only
//! if at least [`MIN_QUOTED_FALLBACK`] were found.
//!
//! An empty list means "no usable signal". Callers must not try to tell the
//! causes apart beyond the [`ListParseMethod`] tag.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;
use thiserror::Error;
use tracing::debug;

use super::{LlmClient, LlmError};

/// Fewest quoted substrings accepted by the fallback tier
pub const MIN_QUOTED_FALLBACK: usize = 3;

const FENCE: &str = "```";

/// Shape the caller expects the completion to have
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedShape {
    /// A JSON object
    Object,
    /// A JSON array of strings; `max` caps fallback recovery
    StringList { max: usize },
}

/// How a string list was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListParseMethod {
    /// Strict JSON array of strings
    Strict,
    /// Recovered from quoted substrings after strict parsing failed
    QuotedFallback,
    /// Valid JSON, but not an array of strings
    ShapeMismatch,
    /// Neither strict parsing nor the fallback produced anything
    NoSignal,
}

/// Result of list recovery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedList {
    pub items: Vec<String>,
    pub method: ListParseMethod,
}

impl ParsedList {
    fn empty(method: ListParseMethod) -> Self {
        Self {
            items: Vec::new(),
            method,
        }
    }
}

/// Parsed completion
#[derive(Debug, Clone, PartialEq)]
pub enum StructuredValue {
    Object(Map<String, Value>),
    StringList(ParsedList),
}

/// Structured completion errors
#[derive(Debug, Error)]
pub enum StructuredError {
    #[error("Completion request failed: {0}")]
    Request(#[from] LlmError),

    #[error("Malformed model output: {0}")]
    Malformed(String),

    #[error("Model output is valid JSON but not {expected}")]
    ShapeMismatch { expected: &'static str },
}

fn quoted_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#""([^"]+)""#).expect("quoted substring pattern is valid"))
}

/// Strip markdown code fences from a completion
///
/// - A fenced pair yields the content strictly between the first two markers,
///   minus an optional language tag (` ```json `).
/// - A lone marker yields the content after it, or the content before it when
///   nothing follows.
/// - Text without markers is returned trimmed.
pub fn sanitize(raw: &str) -> String {
    let trimmed = raw.trim();
    let Some(open) = trimmed.find(FENCE) else {
        return trimmed.to_string();
    };

    let after_open = &trimmed[open + FENCE.len()..];
    if let Some(close) = after_open.find(FENCE) {
        return strip_language_tag(&after_open[..close]).trim().to_string();
    }

    let after = strip_language_tag(after_open).trim();
    if after.is_empty() {
        trimmed[..open].trim().to_string()
    } else {
        after.to_string()
    }
}

/// Drop a leading ` ```lang ` tag line when present
fn strip_language_tag(block: &str) -> &str {
    match block.split_once('\n') {
        Some((first_line, rest)) => {
            let tag = first_line.trim();
            let is_tag = tag
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+' | '.'));
            if is_tag {
                rest
            } else {
                block
            }
        }
        None => block,
    }
}

/// Strict JSON parse, retrying on the outermost `open..close` span
fn parse_json_lenient(text: &str, open: char, close: char) -> Option<Value> {
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        return Some(value);
    }
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    if end <= start {
        return None;
    }
    serde_json::from_str::<Value>(&text[start..=end]).ok()
}

/// Parse a completion expected to hold a JSON array of strings
///
/// Strict parsing recovers the list exactly (no cap). The quoted-substring
/// fallback is capped at `max`.
pub fn parse_string_list(raw: &str, max: usize) -> ParsedList {
    let sanitized = sanitize(raw);

    match parse_json_lenient(&sanitized, '[', ']') {
        Some(Value::Array(values)) => {
            let items: Option<Vec<String>> = values
                .into_iter()
                .map(|v| match v {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect();
            match items {
                Some(items) => ParsedList {
                    items,
                    method: ListParseMethod::Strict,
                },
                None => ParsedList::empty(ListParseMethod::ShapeMismatch),
            }
        }
        Some(_) => ParsedList::empty(ListParseMethod::ShapeMismatch),
        None => {
            let quoted: Vec<String> = quoted_pattern()
                .captures_iter(raw)
                .filter_map(|c| c.get(1))
                .map(|m| m.as_str().to_string())
                .collect();
            debug!(found = quoted.len(), "Strict list parse failed, trying quoted substrings");
            if quoted.len() >= MIN_QUOTED_FALLBACK {
                ParsedList {
                    items: quoted.into_iter().take(max).collect(),
                    method: ListParseMethod::QuotedFallback,
                }
            } else {
                ParsedList::empty(ListParseMethod::NoSignal)
            }
        }
    }
}

/// Parse a completion expected to hold a JSON object
pub fn parse_object(raw: &str) -> Result<Map<String, Value>, StructuredError> {
    let sanitized = sanitize(raw);
    match parse_json_lenient(&sanitized, '{', '}') {
        Some(Value::Object(map)) => Ok(map),
        Some(_) => Err(StructuredError::ShapeMismatch {
            expected: "an object",
        }),
        None => Err(StructuredError::Malformed(preview(&sanitized))),
    }
}

/// Send `prompt` and recover the expected shape from the answer
pub async fn complete_structured(
    client: &dyn LlmClient,
    prompt: &str,
    shape: ExpectedShape,
) -> Result<StructuredValue, StructuredError> {
    let raw = client.complete(prompt).await?;
    match shape {
        ExpectedShape::Object => parse_object(&raw).map(StructuredValue::Object),
        ExpectedShape::StringList { max } => Ok(StructuredValue::StringList(parse_string_list(&raw, max))),
    }
}

/// [`complete_structured`] for [`ExpectedShape::Object`]
pub async fn complete_object(
    client: &dyn LlmClient,
    prompt: &str,
) -> Result<Map<String, Value>, StructuredError> {
    match complete_structured(client, prompt, ExpectedShape::Object).await? {
        StructuredValue::Object(map) => Ok(map),
        StructuredValue::StringList(_) => Err(StructuredError::ShapeMismatch {
            expected: "an object",
        }),
    }
}

/// [`complete_structured`] for [`ExpectedShape::StringList`]
pub async fn complete_string_list(
    client: &dyn LlmClient,
    prompt: &str,
    max: usize,
) -> Result<ParsedList, StructuredError> {
    match complete_structured(client, prompt, ExpectedShape::StringList { max }).await? {
        StructuredValue::StringList(list) => Ok(list),
        StructuredValue::Object(_) => Err(StructuredError::ShapeMismatch {
            expected: "a list of strings",
        }),
    }
}

/// First 120 chars, for log and error messages
fn preview(text: &str) -> String {
    let mut out: String = text.chars().take(120).collect();
    if text.chars().count() > 120 {
        out.push_str("...");
    }
    out
}
