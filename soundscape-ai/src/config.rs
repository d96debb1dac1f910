//! Configuration resolution for soundscape-ai
//!
//! Provides multi-tier configuration resolution with CLI → ENV → TOML →
//! default priority (see [`soundscape_common::config`]). Credentials are
//! optional at startup: a missing key is logged as a warning and the steps
//! that need it degrade per request.

use soundscape_common::config::{resolve_credential, resolve_setting, TomlConfig};
use std::time::Duration;
use tracing::{info, warn};

/// TOML file name looked up in the platform config dir
pub const CONFIG_FILE_NAME: &str = "soundscape-ai.toml";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3002;
pub const DEFAULT_MODEL: &str = "mistral-large-latest";
pub const DEFAULT_MISTRAL_URL: &str = "https://api.mistral.ai/v1";
pub const DEFAULT_FREESOUND_URL: &str = "https://freesound.org/apiv2";
pub const DEFAULT_UNSPLASH_URL: &str = "https://api.unsplash.com";
pub const DEFAULT_FREESOUND_RPS: u32 = 10;
pub const DEFAULT_KEYWORD_COUNT: usize = 6;
pub const DEFAULT_SOUNDS_PER_KEYWORD: usize = 3;
pub const DEFAULT_DESCRIPTION_MAX_CHARS: usize = 300;

pub const ENV_MISTRAL_API_KEY: &str = "MISTRAL_API_KEY";
pub const ENV_FREESOUND_API_KEY: &str = "FREESOUND_API_KEY";
pub const ENV_UNSPLASH_API_KEY: &str = "UNSPLASH_API_KEY";
pub const ENV_LLM_MODEL: &str = "SOUNDSCAPE_LLM_MODEL";
pub const ENV_HOST: &str = "SOUNDSCAPE_HOST";
pub const ENV_PORT: &str = "SOUNDSCAPE_PORT";

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub model: Option<String>,
}

/// Completion service settings
#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Option<Duration>,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_MISTRAL_URL.to_string(),
            timeout: None,
        }
    }
}

/// Audio-search settings
#[derive(Debug, Clone)]
pub struct FreesoundSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub requests_per_second: u32,
    pub timeout: Option<Duration>,
}

impl Default for FreesoundSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_FREESOUND_URL.to_string(),
            requests_per_second: DEFAULT_FREESOUND_RPS,
            timeout: None,
        }
    }
}

/// Image-search settings
#[derive(Debug, Clone)]
pub struct UnsplashSettings {
    pub access_key: Option<String>,
    pub base_url: String,
    pub timeout: Option<Duration>,
}

impl Default for UnsplashSettings {
    fn default() -> Self {
        Self {
            access_key: None,
            base_url: DEFAULT_UNSPLASH_URL.to_string(),
            timeout: None,
        }
    }
}

/// Pipeline sizing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSettings {
    /// Keywords requested per query (N)
    pub keyword_count: usize,
    /// Sounds kept per keyword (K)
    pub sounds_per_keyword: usize,
    /// Description cap in naming prompts
    pub description_max_chars: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            keyword_count: DEFAULT_KEYWORD_COUNT,
            sounds_per_keyword: DEFAULT_SOUNDS_PER_KEYWORD,
            description_max_chars: DEFAULT_DESCRIPTION_MAX_CHARS,
        }
    }
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub llm: LlmSettings,
    pub freesound: FreesoundSettings,
    pub unsplash: UnsplashSettings,
    pub pipeline: PipelineSettings,
}

impl ServiceConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Resolve every setting from CLI → ENV → TOML → default
pub fn resolve_service_config(cli: &CliOverrides, toml: &TomlConfig) -> ServiceConfig {
    let (host, _) = resolve_setting(
        "host",
        cli.host.clone(),
        ENV_HOST,
        toml.server.host.clone(),
        DEFAULT_HOST.to_string(),
    );
    let (port, _) = resolve_setting("port", cli.port, ENV_PORT, toml.server.port, DEFAULT_PORT);
    let (model, model_source) = resolve_setting(
        "LLM model",
        cli.model.clone(),
        ENV_LLM_MODEL,
        toml.llm.model.clone(),
        DEFAULT_MODEL.to_string(),
    );
    info!("LLM model: {} (from {})", model, model_source.label());

    let llm_key = resolve_credential(
        "Mistral API key",
        None,
        ENV_MISTRAL_API_KEY,
        toml.llm.api_key.as_deref(),
    )
    .map(|(key, _)| key);
    if llm_key.is_none() {
        warn!(
            "Mistral API key not configured ({} or [llm] api_key). \
             Validation fails open, keyword expansion returns nothing, \
             naming keeps original names.",
            ENV_MISTRAL_API_KEY
        );
    }

    let freesound_key = resolve_credential(
        "Freesound API key",
        None,
        ENV_FREESOUND_API_KEY,
        toml.freesound.api_key.as_deref(),
    )
    .map(|(key, _)| key);
    if freesound_key.is_none() {
        warn!(
            "Freesound API key not configured ({} or [freesound] api_key). Sound searches will fail.",
            ENV_FREESOUND_API_KEY
        );
    }

    let unsplash_key = resolve_credential(
        "Unsplash access key",
        None,
        ENV_UNSPLASH_API_KEY,
        toml.unsplash.access_key.as_deref(),
    )
    .map(|(key, _)| key);
    if unsplash_key.is_none() {
        warn!(
            "Unsplash access key not configured ({} or [unsplash] access_key). Image lookups will fail.",
            ENV_UNSPLASH_API_KEY
        );
    }

    let pipeline = PipelineSettings {
        keyword_count: positive_or(toml.pipeline.keyword_count, DEFAULT_KEYWORD_COUNT),
        sounds_per_keyword: positive_or(
            toml.pipeline.sounds_per_keyword,
            DEFAULT_SOUNDS_PER_KEYWORD,
        ),
        description_max_chars: positive_or(
            toml.pipeline.description_max_chars,
            DEFAULT_DESCRIPTION_MAX_CHARS,
        ),
    };

    ServiceConfig {
        host,
        port,
        llm: LlmSettings {
            api_key: llm_key,
            model,
            base_url: toml
                .llm
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_MISTRAL_URL.to_string()),
            timeout: toml.llm.timeout_secs.map(Duration::from_secs),
        },
        freesound: FreesoundSettings {
            api_key: freesound_key,
            base_url: toml
                .freesound
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_FREESOUND_URL.to_string()),
            requests_per_second: toml
                .freesound
                .requests_per_second
                .filter(|rps| *rps > 0)
                .unwrap_or(DEFAULT_FREESOUND_RPS),
            timeout: toml.freesound.timeout_secs.map(Duration::from_secs),
        },
        unsplash: UnsplashSettings {
            access_key: unsplash_key,
            base_url: toml
                .unsplash
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_UNSPLASH_URL.to_string()),
            timeout: toml.unsplash.timeout_secs.map(Duration::from_secs),
        },
        pipeline,
    }
}

fn positive_or(value: Option<usize>, default: usize) -> usize {
    value.filter(|v| *v > 0).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_or() {
        assert_eq!(positive_or(Some(4), 6), 4);
        assert_eq!(positive_or(Some(0), 6), 6);
        assert_eq!(positive_or(None, 6), 6);
    }

    #[test]
    fn test_pipeline_defaults() {
        let pipeline = PipelineSettings::default();
        assert_eq!(pipeline.keyword_count, 6);
        assert_eq!(pipeline.sounds_per_keyword, 3);
        assert_eq!(pipeline.description_max_chars, 300);
    }
}
