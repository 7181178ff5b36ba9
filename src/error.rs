//! Error types for the proxy.
//!
//! Every handler failure maps to exactly one HTTP response; nothing is
//! retried and nothing is swallowed.

use axum::http::StatusCode;
use serde_json::json;
use thiserror::Error;

use crate::http::response::ProxiedResponse;
use crate::proxy::upstream::UpstreamError;

/// Failures surfaced by the proxy handler.
///
/// The `Display` text is the `error` field of the JSON response body.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Anything other than POST.
    #[error("Method Not Allowed")]
    MethodNotAllowed,

    /// The credential variable was unset or empty at startup.
    #[error("Server configuration error: {var} not set.")]
    MissingApiKey { var: String },

    /// The inbound body did not parse as JSON.
    #[error("Invalid JSON payload.")]
    InvalidPayload(#[source] serde_json::Error),

    /// The outbound call did not produce a usable reply.
    #[error("Internal server error during API call.")]
    Upstream(#[from] UpstreamError),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ProxyError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            ProxyError::MissingApiKey { .. } | ProxyError::Upstream(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Metrics label for this failure class.
    pub fn outcome(&self) -> &'static str {
        match self {
            ProxyError::MethodNotAllowed | ProxyError::InvalidPayload(_) => "client_error",
            ProxyError::MissingApiKey { .. } => "config_error",
            ProxyError::Upstream(_) => "transport_error",
        }
    }

    /// Render as a JSON error response.
    ///
    /// `expose_details` controls whether transport failures carry a
    /// `details` field with the underlying error text.
    pub fn to_response(&self, expose_details: bool) -> ProxiedResponse {
        let body = match self {
            ProxyError::Upstream(e) if expose_details => json!({
                "error": self.to_string(),
                "details": e.to_string(),
            }),
            _ => json!({ "error": self.to_string() }),
        };
        ProxiedResponse::json(self.status(), body.to_string())
    }
}

/// Failures while assembling the server at startup.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid upstream endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
