//! The proxy handler: validate, attach the key, forward once, relay.

use std::time::Instant;

use axum::http::{Method, StatusCode};
use serde_json::value::RawValue;

use crate::config::ApiKey;
use crate::error::ProxyError;
use crate::http::request::InboundRequest;
use crate::http::response::ProxiedResponse;
use crate::observability::metrics;
use crate::proxy::upstream::{UpstreamClient, UpstreamEndpoint, UpstreamError};

/// Handler settings fixed at startup.
#[derive(Debug, Clone)]
pub struct HandlerSettings {
    /// Environment variable name reported when the key is missing.
    pub api_key_env: String,
    /// Include transport error text in 500 bodies.
    pub expose_error_details: bool,
}

/// Forwards inbound JSON to the upstream `generateContent` endpoint.
///
/// Stateless across requests; share it behind an `Arc`.
pub struct ProxyHandler<C> {
    endpoint: UpstreamEndpoint,
    api_key: Option<ApiKey>,
    settings: HandlerSettings,
    client: C,
}

impl<C: UpstreamClient> ProxyHandler<C> {
    /// `api_key` of `None` is accepted: every POST then answers 500 with a
    /// configuration error instead of the process refusing to start.
    pub fn new(
        endpoint: UpstreamEndpoint,
        api_key: Option<ApiKey>,
        settings: HandlerSettings,
        client: C,
    ) -> Self {
        Self {
            endpoint,
            api_key,
            settings,
            client,
        }
    }

    /// Handle one invocation. Always produces a response.
    pub async fn handle(&self, request: InboundRequest) -> ProxiedResponse {
        let start = Instant::now();
        let method = request.method.clone();

        let (response, outcome) = match self.forward(request).await {
            Ok((response, outcome)) => (response, outcome),
            Err(err) => {
                log_failure(&err);
                (
                    err.to_response(self.settings.expose_error_details),
                    err.outcome(),
                )
            }
        };

        tracing::info!(
            status = response.status.as_u16(),
            outcome,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Request finished"
        );
        metrics::record_request(method.as_str(), response.status.as_u16(), outcome, start);
        response
    }

    async fn forward(
        &self,
        request: InboundRequest,
    ) -> Result<(ProxiedResponse, &'static str), ProxyError> {
        if request.method != Method::POST {
            return Err(ProxyError::MethodNotAllowed);
        }

        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| ProxyError::MissingApiKey {
                var: self.settings.api_key_env.clone(),
            })?;

        let payload: &RawValue =
            serde_json::from_slice(&request.body).map_err(ProxyError::InvalidPayload)?;
        tracing::debug!(payload = payload.get(), "Received payload");

        tracing::debug!(upstream = self.endpoint.as_str(), "Forwarding to upstream");
        let reply = self
            .client
            .post_json(self.endpoint.with_key(api_key), payload.get().to_owned())
            .await?;

        serde_json::from_slice::<serde::de::IgnoredAny>(&reply.body)
            .map_err(UpstreamError::InvalidJson)?;

        if !reply.status.is_success() {
            tracing::warn!(
                upstream_status = reply.status.as_u16(),
                body = %String::from_utf8_lossy(&reply.body),
                "Upstream returned an error"
            );
            return Ok((
                ProxiedResponse::json(reply.status, reply.body),
                "upstream_error",
            ));
        }

        tracing::debug!("Upstream call succeeded");
        Ok((ProxiedResponse::json(StatusCode::OK, reply.body), "ok"))
    }
}

fn log_failure(err: &ProxyError) {
    match err {
        ProxyError::MethodNotAllowed => tracing::debug!(error = %err, "Rejected request"),
        ProxyError::InvalidPayload(source) => {
            tracing::warn!(error = %source, "Error parsing JSON payload")
        }
        ProxyError::MissingApiKey { var } => {
            tracing::error!(var = %var, "Upstream API key is not set")
        }
        ProxyError::Upstream(source) => {
            tracing::error!(error = %source, "Upstream call failed")
        }
    }
}
