//! Startup sequencing.
//!
//! # Responsibilities
//! - Read the API key once from the configured environment variable
//! - Start the metrics exporter when enabled
//! - Bind the listener and serve until shutdown

use std::error::Error;
use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::config::{ApiKey, ProxyConfig};
use crate::http::HttpServer;
use crate::observability::metrics;

/// Start the proxy with a validated config and serve until shutdown.
pub async fn run(
    config: ProxyConfig,
    shutdown: broadcast::Receiver<()>,
) -> Result<(), Box<dyn Error>> {
    let api_key = ApiKey::from_env(&config.upstream.api_key_env);
    if api_key.is_some() {
        tracing::info!(var = %config.upstream.api_key_env, "API key presence confirmed");
    }

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
        tracing::info!(address = %addr, "Metrics exporter listening");
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        "Listening for connections"
    );

    let server = HttpServer::new(config, api_key)?;
    server.run(listener, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
