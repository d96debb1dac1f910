//! soundscape-ai - Soundscape generation service
//!
//! Turns a natural-language description into matching sound clips, track
//! names, an illustrative image and a short description, by orchestrating a
//! completion API (Mistral), Freesound and Unsplash.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use soundscape_ai::config::{resolve_service_config, CliOverrides, CONFIG_FILE_NAME};
use soundscape_ai::llm::MistralClient;
use soundscape_ai::services::{FreesoundClient, UnsplashClient};
use soundscape_ai::{build_router, AppState};
use soundscape_common::config::load_or_default;

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(name = "soundscape-ai", version, about = "Soundscape generation service")]
struct Args {
    /// TOML config file (default: <config dir>/soundscape/soundscape-ai.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address
    #[arg(long)]
    host: Option<String>,

    /// Listen port
    #[arg(short, long)]
    port: Option<u16>,

    /// Completion model identifier
    #[arg(long)]
    model: Option<String>,

    /// Default log level when RUST_LOG is unset
    #[arg(long, env = "SOUNDSCAPE_LOG_LEVEL")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is read first so its log level can seed the filter
    let toml_config = load_or_default(args.config.as_deref(), CONFIG_FILE_NAME)
        .context("Failed to load configuration file")?;

    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| toml_config.logging.level.clone());
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!(
        "Starting soundscape-ai v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let cli = CliOverrides {
        host: args.host,
        port: args.port,
        model: args.model,
    };
    let config = resolve_service_config(&cli, &toml_config);
    info!(
        keyword_count = config.pipeline.keyword_count,
        sounds_per_keyword = config.pipeline.sounds_per_keyword,
        freesound_rps = config.freesound.requests_per_second,
        "Pipeline configured"
    );

    let llm = MistralClient::new(&config.llm).context("Failed to build completion client")?;
    if !llm.is_configured() {
        warn!("Completion client has no API key; LLM steps will run in degraded mode");
    }
    let freesound =
        FreesoundClient::new(&config.freesound).context("Failed to build Freesound client")?;
    let unsplash =
        UnsplashClient::new(&config.unsplash).context("Failed to build Unsplash client")?;

    let state = AppState::new(
        Arc::new(llm),
        Arc::new(freesound),
        Arc::new(unsplash),
        config.pipeline,
    );
    let app = build_router(state);

    let bind_address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    info!("Listening on http://{}", bind_address);
    info!("Health check: http://{}/health", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
