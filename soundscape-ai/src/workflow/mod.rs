//! LLM-backed workflow steps
//!
//! Each step takes its collaborators explicitly and returns a
//! [`StepOutcome`]. None of them propagates an upstream error: transport and
//! parse failures become degraded values (fail-open verdict, empty keyword
//! set, original track names) or, for description and chat only, `Failed`.

pub mod chat;
pub mod description;
pub mod keywords;
pub mod naming;
pub mod soundscape;
pub mod validation;

use tracing::{info, warn};

use crate::models::StepOutcome;

pub use chat::answer;
pub use description::generate_description;
pub use keywords::{expand_keywords, generate_style_keywords, pick_style};
pub use naming::rename_tracks;
pub use soundscape::{build_soundscape, find_single_sound, SoundscapeResult};
pub use validation::validate_input;

/// Log a step outcome: `info` on success, `warn` with the cause otherwise
pub fn log_outcome<T>(step: &str, outcome: &StepOutcome<T>) {
    match outcome {
        StepOutcome::Success(_) => info!(step = %step, "Step succeeded"),
        StepOutcome::Degraded { cause, .. } => {
            warn!(step = %step, cause = %cause, "Step degraded, continuing with fallback")
        }
        StepOutcome::Failed { cause } => warn!(step = %step, cause = %cause, "Step failed"),
    }
}
