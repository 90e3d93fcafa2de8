//! Soiree API Server
//!
//! Run with: cargo run --bin soiree
//!
//! # Configuration
//!
//! Read from `--config <path>` when given, else the first of
//! `~/.config/soiree/config.toml`, `/etc/soiree/config.toml` and
//! `./config.toml`. `SOIREE_*` environment variables override file values
//! (see `soiree-cli config` for the full template). `RUST_LOG` overrides
//! the configured log level.

use anyhow::Context;
use clap::Parser;
use soiree::api::{serve, AppState};
use soiree::config::{Config, LoggingConfig};
use soiree::App;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "soiree")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Invitation links, guest RSVPs and the host tracker over HTTP")]
struct Args {
    /// Config file (default: search the standard locations)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config_path = args.config.or_else(Config::find_default_path);
    let config = match &config_path {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => Config::from_env(),
    };

    init_tracing(&config.logging);

    match &config_path {
        Some(path) => tracing::info!("Loaded config from {:?}", path),
        None => tracing::info!("Using default config with environment overrides"),
    }
    tracing::info!("Starting Soiree API server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Event: {}", config.event.label);
    tracing::info!("Guest links based on {}", config.event.base_url);
    tracing::info!("Local mirror directory: {}", config.local.data_dir);

    let app = App::from_config(&config).context("Failed to initialize application")?;
    let status = app.status();
    tracing::info!(status = ?status.status, "{}", status.message);

    let state = AppState::new(app, config);
    serve(state).await.context("API server failed")?;

    tracing::info!("Soiree API server stopped");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("soiree={},tower_http=debug", logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);

    if logging.format.eq_ignore_ascii_case("json") {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
