//! Configuration loading and tiered setting resolution
//!
//! Every setting is resolved in the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Environment variable naming an explicit TOML config file
pub const CONFIG_PATH_ENV: &str = "SOUNDSCAPE_CONFIG";

/// TOML configuration file contents
///
/// All sections and fields are optional; missing values fall through to
/// compiled defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub llm: LlmConfig,
    pub freesound: FreesoundConfig,
    pub unsplash: UnsplashConfig,
    pub pipeline: PipelineConfig,
}

/// `[server]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// `[logging]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing level when RUST_LOG is unset ("trace" .. "error")
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// `[llm]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// `[freesound]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FreesoundConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub requests_per_second: Option<u32>,
    pub timeout_secs: Option<u64>,
}

/// `[unsplash]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UnsplashConfig {
    pub access_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// `[pipeline]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Keywords requested from the model per query (N)
    pub keyword_count: Option<usize>,
    /// Sounds kept per keyword (K)
    pub sounds_per_keyword: Option<usize>,
    /// Description length cap used in naming prompts
    pub description_max_chars: Option<usize>,
}

/// Where a resolved setting came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingSource {
    CommandLine,
    Environment,
    Toml,
    Default,
}

impl SettingSource {
    pub fn label(&self) -> &'static str {
        match self {
            SettingSource::CommandLine => "command line",
            SettingSource::Environment => "environment",
            SettingSource::Toml => "TOML",
            SettingSource::Default => "default",
        }
    }
}

/// Locate the TOML config file
///
/// Priority: explicit CLI path → `SOUNDSCAPE_CONFIG` → platform config dir
/// (`~/.config/soundscape/<file_name>` on Linux). Returns `None` when no file
/// exists; an explicitly named file that does not exist is an error.
pub fn resolve_config_path(cli_arg: Option<&Path>, file_name: &str) -> Result<Option<PathBuf>> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return require_existing(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        if !path.trim().is_empty() {
            return require_existing(PathBuf::from(path));
        }
    }

    // Priority 3: Platform config directory
    let default_path = dirs::config_dir().map(|d| d.join("soundscape").join(file_name));
    match default_path {
        Some(path) if path.exists() => Ok(Some(path)),
        _ => {
            debug!("No config file found for {}", file_name);
            Ok(None)
        }
    }
}

fn require_existing(path: PathBuf) -> Result<Option<PathBuf>> {
    if path.exists() {
        Ok(Some(path))
    } else {
        Err(Error::Config(format!("Config file not found: {}", path.display())))
    }
}

/// Read and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: TomlConfig = toml::from_str(&content)?;
    info!("Loaded config file: {}", path.display());
    Ok(config)
}

/// Load the config file if one is found, defaults otherwise
pub fn load_or_default(cli_arg: Option<&Path>, file_name: &str) -> Result<TomlConfig> {
    match resolve_config_path(cli_arg, file_name)? {
        Some(path) => load_toml_config(&path),
        None => Ok(TomlConfig::default()),
    }
}

/// Validate credential (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Resolve a credential from CLI → ENV → TOML
///
/// Blank values are ignored at every tier. Returns `None` when no tier holds a
/// usable value; the caller decides whether that is fatal.
pub fn resolve_credential(
    name: &str,
    cli_value: Option<&str>,
    env_var: &str,
    toml_value: Option<&str>,
) -> Option<(String, SettingSource)> {
    let env_value = std::env::var(env_var).ok();

    let candidates = [
        (cli_value, SettingSource::CommandLine),
        (env_value.as_deref(), SettingSource::Environment),
        (toml_value, SettingSource::Toml),
    ];

    let valid: Vec<(&str, SettingSource)> = candidates
        .iter()
        .filter_map(|(value, source)| value.filter(|v| is_valid_key(v)).map(|v| (v, *source)))
        .collect();

    // Warn if multiple sources (potential misconfiguration)
    if valid.len() > 1 {
        let sources: Vec<&str> = valid.iter().map(|(_, s)| s.label()).collect();
        warn!(
            "{} found in multiple sources: {}. Using {} (highest priority).",
            name,
            sources.join(", "),
            valid[0].1.label()
        );
    }

    valid.first().map(|(value, source)| {
        info!("{} loaded from {}", name, source.label());
        (value.trim().to_string(), *source)
    })
}

/// Resolve a plain setting from CLI → ENV → TOML → default
///
/// An environment value that fails to parse is logged and skipped.
pub fn resolve_setting<T>(
    name: &str,
    cli_value: Option<T>,
    env_var: &str,
    toml_value: Option<T>,
    default: T,
) -> (T, SettingSource)
where
    T: FromStr,
{
    if let Some(value) = cli_value {
        return (value, SettingSource::CommandLine);
    }

    if let Ok(raw) = std::env::var(env_var) {
        match raw.trim().parse::<T>() {
            Ok(value) => return (value, SettingSource::Environment),
            Err(_) => warn!("Ignoring unparseable {} in {}: {:?}", name, env_var, raw),
        }
    }

    if let Some(value) = toml_value {
        return (value, SettingSource::Toml);
    }

    (default, SettingSource::Default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_key() {
        assert!(is_valid_key("abc"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("   \t"));
    }

    #[test]
    fn test_toml_defaults_when_sections_missing() {
        let config: TomlConfig = toml::from_str("[llm]\nmodel = \"m\"\n").unwrap();
        assert_eq!(config.llm.model.as_deref(), Some("m"));
        assert_eq!(config.logging.level, "info");
        assert!(config.freesound.api_key.is_none());
        assert!(config.pipeline.keyword_count.is_none());
    }

    #[test]
    fn test_setting_source_labels() {
        assert_eq!(SettingSource::CommandLine.label(), "command line");
        assert_eq!(SettingSource::Toml.label(), "TOML");
    }
}
