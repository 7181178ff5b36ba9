//! Gemini proxy server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client POST              ┌──────────────────────────────────────────────┐
//!     ─────────────────────────┼─▶ http::server (request id, trace, limit)    │
//!                              │        │                                     │
//!                              │        ▼                                     │
//!                              │   proxy::handler                             │
//!                              │     method? key? JSON?  ── no ──▶ 405/500/400│
//!                              │        │                                     │
//!                              │        ▼                                     │
//!                              │   proxy::upstream ──── POST ?key=… ──────────┼──▶ Gemini API
//!                              │        │                                     │
//!     Client Response          │        ▼                                     │
//!     ◀────────────────────────┼── status + body, unchanged                   │
//!                              └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use gemini_proxy::config::{load_config, validate_config, ConfigError, ProxyConfig};
use gemini_proxy::lifecycle::{startup, Shutdown};
use gemini_proxy::observability::logging;

#[derive(Parser)]
#[command(name = "gemini-proxy")]
#[command(about = "Forwards JSON requests to the Gemini API with a server-held key", long_about = None)]
struct Cli {
    /// Path to a TOML config file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init_tracing(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config_file = ?cli.config,
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        model = %config.upstream.model,
        "gemini-proxy starting"
    );

    let shutdown = Shutdown::new();
    startup::run(config, shutdown.subscribe()).await
}
