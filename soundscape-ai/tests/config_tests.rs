//! Service configuration resolution tests
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.

use serial_test::serial;
use soundscape_ai::config::{
    resolve_service_config, CliOverrides, DEFAULT_FREESOUND_RPS, DEFAULT_HOST, DEFAULT_MODEL,
    DEFAULT_PORT, ENV_FREESOUND_API_KEY, ENV_HOST, ENV_LLM_MODEL, ENV_MISTRAL_API_KEY, ENV_PORT,
    ENV_UNSPLASH_API_KEY,
};
use soundscape_common::config::TomlConfig;
use std::time::Duration;

const ALL_ENV: [&str; 6] = [
    ENV_MISTRAL_API_KEY,
    ENV_FREESOUND_API_KEY,
    ENV_UNSPLASH_API_KEY,
    ENV_LLM_MODEL,
    ENV_HOST,
    ENV_PORT,
];

fn clear_env() {
    for var in ALL_ENV {
        std::env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_defaults_without_any_source() {
    clear_env();

    let config = resolve_service_config(&CliOverrides::default(), &TomlConfig::default());

    assert_eq!(config.host, DEFAULT_HOST);
    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.llm.model, DEFAULT_MODEL);
    assert!(config.llm.api_key.is_none());
    assert!(config.llm.timeout.is_none());
    assert!(config.freesound.api_key.is_none());
    assert!(config.unsplash.access_key.is_none());
    assert_eq!(config.freesound.requests_per_second, DEFAULT_FREESOUND_RPS);
    assert_eq!(config.bind_address(), "127.0.0.1:3002");
}

#[test]
#[serial]
fn test_toml_values_applied() {
    clear_env();

    let toml: TomlConfig = toml::from_str(
        r#"
        [server]
        port = 8080

        [llm]
        api_key = "toml-mistral"
        model = "mistral-small-latest"
        timeout_secs = 30

        [freesound]
        api_key = "toml-freesound"
        requests_per_second = 0

        [pipeline]
        keyword_count = 4
        sounds_per_keyword = 0
        "#,
    )
    .unwrap();

    let config = resolve_service_config(&CliOverrides::default(), &toml);

    assert_eq!(config.port, 8080);
    assert_eq!(config.llm.api_key.as_deref(), Some("toml-mistral"));
    assert_eq!(config.llm.model, "mistral-small-latest");
    assert_eq!(config.llm.timeout, Some(Duration::from_secs(30)));
    assert_eq!(config.freesound.api_key.as_deref(), Some("toml-freesound"));
    // Non-positive values fall back to defaults
    assert_eq!(config.freesound.requests_per_second, DEFAULT_FREESOUND_RPS);
    assert_eq!(config.pipeline.keyword_count, 4);
    assert_eq!(config.pipeline.sounds_per_keyword, 3);
}

#[test]
#[serial]
fn test_env_overrides_toml_and_cli_overrides_env() {
    clear_env();
    std::env::set_var(ENV_MISTRAL_API_KEY, "env-mistral");
    std::env::set_var(ENV_LLM_MODEL, "env-model");
    std::env::set_var(ENV_PORT, "9000");

    let mut toml = TomlConfig::default();
    toml.llm.api_key = Some("toml-mistral".to_string());
    toml.llm.model = Some("toml-model".to_string());

    let cli = CliOverrides {
        model: Some("cli-model".to_string()),
        ..CliOverrides::default()
    };
    let config = resolve_service_config(&cli, &toml);

    assert_eq!(config.llm.api_key.as_deref(), Some("env-mistral"));
    assert_eq!(config.llm.model, "cli-model");
    assert_eq!(config.port, 9000);

    clear_env();
}

#[test]
#[serial]
fn test_blank_env_credential_ignored() {
    clear_env();
    std::env::set_var(ENV_UNSPLASH_API_KEY, "   ");

    let mut toml = TomlConfig::default();
    toml.unsplash.access_key = Some("toml-unsplash".to_string());

    let config = resolve_service_config(&CliOverrides::default(), &toml);
    assert_eq!(config.unsplash.access_key.as_deref(), Some("toml-unsplash"));

    clear_env();
}
