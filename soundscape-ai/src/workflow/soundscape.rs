//! End-to-end soundscape pipeline
//!
//! validate → expand keywords → aggregate sounds → optional rename.
//! When expansion yields nothing, the trimmed query itself is searched.

use tracing::info;

use super::{expand_keywords, log_outcome, rename_tracks, validate_input};
use crate::config::PipelineSettings;
use crate::llm::LlmClient;
use crate::models::{Sound, ValidationVerdict};
use crate::services::{enrich, FreesoundError, SoundAggregator, SoundSearch};

/// What the keyword+search operation produced
#[derive(Debug, Clone, PartialEq)]
pub enum SoundscapeResult {
    /// Rejected by the relevance check
    Invalid {
        reason: String,
        suggestions: Vec<String>,
    },
    /// Nothing found for any keyword
    NoSounds { keywords: Vec<String> },
    Found {
        keywords: Vec<String>,
        sounds: Vec<Sound>,
        /// Keywords are the raw query because expansion returned none
        keywords_fallback: bool,
    },
}

/// Run the keyword+search pipeline for one query
pub async fn build_soundscape(
    llm: &dyn LlmClient,
    aggregator: &SoundAggregator,
    settings: &PipelineSettings,
    query: &str,
    rename: bool,
) -> SoundscapeResult {
    let query = query.trim();

    let verdict = validate_input(llm, query).await;
    log_outcome("validation", &verdict);
    if let Some(ValidationVerdict::Invalid {
        reason,
        suggestions,
    }) = verdict.into_value()
    {
        info!(query = %query, reason = %reason, "Query rejected as unrelated to sound");
        return SoundscapeResult::Invalid {
            reason,
            suggestions,
        };
    }

    let expansion = expand_keywords(llm, query, settings.keyword_count).await;
    log_outcome("keyword expansion", &expansion);
    let mut keywords = expansion.into_value().unwrap_or_default();

    let keywords_fallback = keywords.is_empty();
    if keywords_fallback {
        info!(query = %query, "No keywords generated, searching with the query itself");
        keywords = vec![query.to_string()];
    }

    let aggregate = aggregator.aggregate(&keywords).await;
    log_outcome("sound aggregation", &aggregate);
    let mut sounds = aggregate.into_value().unwrap_or_default();

    if sounds.is_empty() {
        return SoundscapeResult::NoSounds { keywords };
    }

    if rename {
        let renamed = rename_tracks(llm, sounds, settings.description_max_chars).await;
        log_outcome("track naming", &renamed);
        sounds = renamed.into_value().unwrap_or_default();
    }

    info!(
        query = %query,
        model = %llm.model(),
        keywords = keywords.len(),
        sounds = sounds.len(),
        "Soundscape assembled"
    );

    SoundscapeResult::Found {
        keywords,
        sounds,
        keywords_fallback,
    }
}

/// Best single match for `query`, renamed on a best-effort basis
///
/// `Ok(None)` when the provider has nothing for the query.
pub async fn find_single_sound(
    llm: &dyn LlmClient,
    search: &dyn SoundSearch,
    query: &str,
    description_max_chars: usize,
) -> Result<Option<Sound>, FreesoundError> {
    let Some(candidate) = search.search(query.trim(), 1).await?.into_iter().next() else {
        return Ok(None);
    };

    let mut sound = enrich(candidate, search.access_token());
    sound.sound_number = Some("1".to_string());

    let renamed = rename_tracks(llm, vec![sound.clone()], description_max_chars).await;
    log_outcome("track naming", &renamed);

    Ok(Some(
        renamed
            .into_value()
            .and_then(|sounds| sounds.into_iter().next())
            .unwrap_or(sound),
    ))
}
