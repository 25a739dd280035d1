//! Image relay (v1)
//!
//! A single-endpoint proxy built with Tokio and Axum. Callers POST a prompt
//! and an inline image; the relay forwards them to the generation API with a
//! server-held key and returns the generated image as base64.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌───────────────────────────────────────────────┐
//!                         │                 IMAGE RELAY                   │
//!   Client Request        │  ┌─────────┐    ┌──────────┐    ┌──────────┐  │
//!   ──────────────────────┼─▶│  http   │───▶│  relay   │───▶│ upstream │──┼──▶ Generation
//!                         │  │ server  │    │ handler  │    │  client  │  │      API
//!   Client Response       │  └─────────┘    └──────────┘    └──────────┘  │
//!   ◀─────────────────────┼── { base64Data } | { error, details? } ◀──────┼───
//!                         │                                               │
//!                         │  ┌──────────┐ ┌───────────────┐ ┌───────────┐ │
//!                         │  │  config  │ │ observability │ │ lifecycle │ │
//!                         │  └──────────┘ └───────────────┘ └───────────┘ │
//!                         └───────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use image_relay::config::{load_config, RelayConfig};
use image_relay::lifecycle::startup;
use image_relay::observability::logging;

#[derive(Parser)]
#[command(name = "image-relay")]
#[command(about = "Relay prompt + image requests to a generative image API", long_about = None)]
struct Cli {
    /// Path to a TOML config file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RelayConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability);

    tracing::info!("image-relay v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        path = %config.listener.path,
        default_model = %config.upstream.default_model,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
