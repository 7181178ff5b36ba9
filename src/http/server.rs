//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router routing every path and method to the proxy handler
//! - Wire up middleware (request ID, tracing, body limit)
//! - Bind server to listener
//! - Stop on shutdown signal

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::HeaderMap,
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::Instrument;

use crate::config::{ApiKey, ProxyConfig};
use crate::error::ServerError;
use crate::http::request::{request_id, InboundRequest};
use crate::http::response::ProxiedResponse;
use crate::lifecycle::signals::shutdown_signal;
use crate::proxy::{HandlerSettings, ProxyHandler, ReqwestUpstream, UpstreamClient, UpstreamEndpoint};

/// HTTP server for the proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a server forwarding through a `reqwest` client.
    pub fn new(config: ProxyConfig, api_key: Option<ApiKey>) -> Result<Self, ServerError> {
        let client = ReqwestUpstream::new(config.upstream.timeout_secs.map(Duration::from_secs))?;
        Self::with_client(config, api_key, client)
    }

    /// Create a server forwarding through the given upstream client.
    pub fn with_client<C: UpstreamClient>(
        config: ProxyConfig,
        api_key: Option<ApiKey>,
        client: C,
    ) -> Result<Self, ServerError> {
        let endpoint = UpstreamEndpoint::new(&config.upstream.base_url, &config.upstream.model)?;

        if api_key.is_none() {
            tracing::error!(
                var = %config.upstream.api_key_env,
                "Upstream API key is not set; every request will fail with 500"
            );
        }

        let handler = Arc::new(ProxyHandler::new(
            endpoint,
            api_key,
            HandlerSettings {
                api_key_env: config.upstream.api_key_env.clone(),
                expose_error_details: config.upstream.expose_error_details,
            },
            client,
        ));

        let router = Self::build_router(&config, handler);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router<C: UpstreamClient>(config: &ProxyConfig, handler: Arc<ProxyHandler<C>>) -> Router {
        Router::new()
            .route("/", any(proxy_handler::<C>))
            .route("/{*path}", any(proxy_handler::<C>))
            .with_state(handler)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(DefaultBodyLimit::disable())
                    .layer(RequestBodyLimitLayer::new(config.security.max_body_size)),
            )
    }

    /// The configured router, for driving the service without a socket.
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Run the server, accepting connections on the given listener until
    /// Ctrl+C, SIGTERM, or a message on `shutdown`.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream_model = %self.config.upstream.model,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

/// Adapts an axum request to the proxy handler.
async fn proxy_handler<C: UpstreamClient>(
    State(handler): State<Arc<ProxyHandler<C>>>,
    headers: HeaderMap,
    request: InboundRequest,
) -> ProxiedResponse {
    let span = tracing::info_span!(
        "proxy",
        request_id = %request_id(&headers),
        method = %request.method,
    );
    handler.handle(request).instrument(span).await
}
