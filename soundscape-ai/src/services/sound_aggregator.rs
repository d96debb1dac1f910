//! Multi-keyword sound aggregation
//!
//! One search per keyword, issued concurrently. Results are appended in
//! keyword order, capped per keyword, with no cross-keyword deduplication.
//! A failing keyword is logged and skipped.

use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, warn};

use super::SoundSearch;
use crate::models::{Sound, SoundCandidate, StepOutcome};

/// Turn a provider record into a caller-facing [`Sound`]
///
/// The download reference gains the access token as a query parameter. The
/// high-quality preview, when present, is surfaced as `preview_url` and is
/// also used as `sound_url` if there is no download reference.
pub fn enrich(candidate: SoundCandidate, token: Option<&str>) -> Sound {
    let preview_url = candidate.hq_preview().map(str::to_string);
    let download_url = candidate
        .download
        .as_deref()
        .filter(|url| !url.trim().is_empty())
        .map(|url| match token {
            Some(token) => {
                let separator = if url.contains('?') { '&' } else { '?' };
                format!("{url}{separator}token={token}")
            }
            None => url.to_string(),
        });

    Sound {
        sound_number: None,
        freesound_id: candidate.id.map(|id| id.to_string()),
        name: candidate.name,
        description: candidate.description,
        sound_url: download_url.or_else(|| preview_url.clone()),
        preview_url,
        duration: candidate.duration,
        license: candidate.license,
        freesound_name: None,
        extra: Default::default(),
    }
}

/// Fans keyword searches out to a [`SoundSearch`] provider
pub struct SoundAggregator {
    search: Arc<dyn SoundSearch>,
    per_keyword: usize,
}

impl SoundAggregator {
    pub fn new(search: Arc<dyn SoundSearch>, per_keyword: usize) -> Self {
        Self {
            search,
            per_keyword: per_keyword.max(1),
        }
    }

    /// Aggregate up to `per_keyword` sounds for each keyword
    ///
    /// Blank keywords are skipped. An empty aggregate is a valid result.
    /// Returns `Degraded` (with whatever was collected) if any keyword failed.
    pub async fn aggregate(&self, keywords: &[String]) -> StepOutcome<Vec<Sound>> {
        let keywords: Vec<&str> = keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .collect();

        let searches = keywords
            .iter()
            .map(|keyword| self.search.search(keyword, self.per_keyword));
        let results = join_all(searches).await;

        let token = self.search.access_token();
        let mut sounds = Vec::new();
        let mut failed = Vec::new();

        for (keyword, result) in keywords.iter().zip(results) {
            match result {
                Ok(candidates) => {
                    debug!(keyword = %keyword, found = candidates.len(), "Keyword search complete");
                    sounds.extend(
                        candidates
                            .into_iter()
                            .take(self.per_keyword)
                            .map(|candidate| enrich(candidate, token)),
                    );
                }
                Err(e) => {
                    warn!(keyword = %keyword, error = %e, "Sound search failed, skipping keyword");
                    failed.push(keyword.to_string());
                }
            }
        }

        for (idx, sound) in sounds.iter_mut().enumerate() {
            sound.sound_number = Some((idx + 1).to_string());
        }

        if failed.is_empty() {
            StepOutcome::Success(sounds)
        } else {
            StepOutcome::degraded(
                sounds,
                format!("search failed for keywords: {}", failed.join(", ")),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HQ_PREVIEW_KEY;
    use std::collections::HashMap;

    fn candidate(id: u64) -> SoundCandidate {
        SoundCandidate {
            id: Some(id),
            name: Some(format!("sound_{id}.wav")),
            download: Some(format!("https://freesound.org/apiv2/sounds/{id}/download/")),
            ..Default::default()
        }
    }

    #[test]
    fn test_enrich_appends_token() {
        let sound = enrich(candidate(7), Some("secret"));
        assert_eq!(sound.freesound_id.as_deref(), Some("7"));
        assert_eq!(
            sound.sound_url.as_deref(),
            Some("https://freesound.org/apiv2/sounds/7/download/?token=secret")
        );
        assert!(sound.preview_url.is_none());
    }

    #[test]
    fn test_enrich_existing_query_uses_ampersand() {
        let mut c = candidate(1);
        c.download = Some("https://example.org/dl?format=mp3".to_string());
        let sound = enrich(c, Some("t"));
        assert_eq!(sound.sound_url.as_deref(), Some("https://example.org/dl?format=mp3&token=t"));
    }

    #[test]
    fn test_enrich_preview_fallback() {
        let mut previews = HashMap::new();
        previews.insert(HQ_PREVIEW_KEY.to_string(), "https://cdn/1-hq.mp3".to_string());
        let c = SoundCandidate {
            id: Some(1),
            previews: Some(previews),
            ..Default::default()
        };
        let sound = enrich(c, Some("t"));
        assert_eq!(sound.preview_url.as_deref(), Some("https://cdn/1-hq.mp3"));
        assert_eq!(sound.sound_url.as_deref(), Some("https://cdn/1-hq.mp3"));
    }

    #[test]
    fn test_enrich_without_token() {
        let sound = enrich(candidate(3), None);
        assert_eq!(
            sound.sound_url.as_deref(),
            Some("https://freesound.org/apiv2/sounds/3/download/")
        );
    }
}
