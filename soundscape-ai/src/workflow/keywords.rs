//! Keyword expansion and style-seeded keyword generation

use rand::Rng;

use crate::llm::{complete_string_list, ListParseMethod, LlmClient, ParsedList, StructuredError};
use crate::models::{StepOutcome, StyledKeywords};
use crate::prompts::{keyword_prompt, style_keywords_prompt, STYLES};

/// Trim entries, drop empties, and grade the outcome by how the list was obtained
fn clean_keywords(
    result: Result<ParsedList, StructuredError>,
    cap: Option<usize>,
) -> StepOutcome<Vec<String>> {
    let list = match result {
        Ok(list) => list,
        Err(e) => return StepOutcome::degraded(Vec::new(), e.to_string()),
    };

    let mut keywords: Vec<String> = list
        .items
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect();
    if let Some(cap) = cap {
        keywords.truncate(cap);
    }

    match list.method {
        ListParseMethod::Strict => StepOutcome::Success(keywords),
        ListParseMethod::QuotedFallback => {
            StepOutcome::degraded(keywords, "keywords recovered from quoted substrings")
        }
        ListParseMethod::ShapeMismatch => {
            StepOutcome::degraded(Vec::new(), "keyword answer is not a list of strings")
        }
        ListParseMethod::NoSignal => {
            StepOutcome::degraded(Vec::new(), "keyword answer could not be parsed")
        }
    }
}

/// Expand a description into (about) `count` search keywords
///
/// A strictly parsed list is kept whole, so it may hold more or fewer than
/// `count` entries.
pub async fn expand_keywords(
    llm: &dyn LlmClient,
    user_text: &str,
    count: usize,
) -> StepOutcome<Vec<String>> {
    let result = complete_string_list(llm, &keyword_prompt(user_text, count), count).await;
    clean_keywords(result, None)
}

/// Pick one style uniformly at random
pub fn pick_style<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    STYLES[rng.gen_range(0..STYLES.len())]
}

/// Up to `count` keywords inspired by `style`
pub async fn generate_style_keywords(
    llm: &dyn LlmClient,
    style: &str,
    count: usize,
) -> StepOutcome<StyledKeywords> {
    let result = complete_string_list(llm, &style_keywords_prompt(style, count), count).await;
    let style = style.to_string();

    match clean_keywords(result, Some(count)) {
        StepOutcome::Success(keywords) => StepOutcome::Success(StyledKeywords { style, keywords }),
        StepOutcome::Degraded { value, cause } => StepOutcome::Degraded {
            value: StyledKeywords {
                style,
                keywords: value,
            },
            cause,
        },
        StepOutcome::Failed { cause } => StepOutcome::Failed { cause },
    }
}
