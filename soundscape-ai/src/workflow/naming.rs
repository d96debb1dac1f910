//! Track naming
//!
//! One batched completion names every record. The answer is reconciled to
//! the input length: missing names fall back to the record's own name (or a
//! positional placeholder), extra names are dropped. When nothing usable
//! comes back the records are returned exactly as given.

use crate::llm::{complete_string_list, ListParseMethod, LlmClient};
use crate::models::{Sound, StepOutcome};
use crate::prompts::{track_names_prompt, UNNAMED_SOUND};

/// Rename `sounds`, keeping each original name in `freesound_name`
pub async fn rename_tracks(
    llm: &dyn LlmClient,
    sounds: Vec<Sound>,
    description_max_chars: usize,
) -> StepOutcome<Vec<Sound>> {
    if sounds.is_empty() {
        return StepOutcome::Success(sounds);
    }

    let prompt = track_names_prompt(&sounds, description_max_chars);
    let list = match complete_string_list(llm, &prompt, sounds.len()).await {
        Ok(list) => list,
        Err(e) => return StepOutcome::degraded(sounds, e.to_string()),
    };

    let exact = match list.method {
        ListParseMethod::Strict => list.items.len() == sounds.len(),
        ListParseMethod::QuotedFallback => false,
        ListParseMethod::ShapeMismatch | ListParseMethod::NoSignal => {
            return StepOutcome::degraded(sounds, "track name answer could not be parsed");
        }
    };

    let generated = list.items.len();
    let expected = sounds.len();
    let renamed = apply_names(sounds, list.items);

    if exact {
        StepOutcome::Success(renamed)
    } else {
        StepOutcome::degraded(
            renamed,
            format!(
                "got {} names for {} sounds ({:?})",
                generated, expected, list.method
            ),
        )
    }
}

/// Pair each record with its reconciled name
fn apply_names(sounds: Vec<Sound>, names: Vec<String>) -> Vec<Sound> {
    let mut names = names.into_iter();

    sounds
        .into_iter()
        .enumerate()
        .map(|(idx, mut sound)| {
            let original = sound.name.clone();
            let fallback = original
                .clone()
                .unwrap_or_else(|| format!("Sound {}", idx + 1));

            let name = names
                .next()
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .unwrap_or(fallback);

            if sound.freesound_name.is_none() {
                sound.freesound_name = Some(original.unwrap_or_else(|| UNNAMED_SOUND.to_string()));
            }
            sound.name = Some(name);
            sound
        })
        .collect()
}
