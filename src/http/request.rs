//! Request extraction.
//!
//! # Responsibilities
//! - Reduce an axum request to the handler's input (method + raw body)
//! - Read the correlation id assigned by the request-id layer
//!
//! # Design Decisions
//! - The body is buffered as bytes and parsed by the handler, so a bad
//!   body becomes the proxy's own 400 instead of an extractor rejection
//! - Body size limits are enforced by the middleware stack before this runs

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, FromRequest, Request},
    http::{HeaderMap, HeaderName, Method},
};

/// Header carrying the per-request correlation id.
pub static X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Input to the proxy handler.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    pub body: Bytes,
}

impl InboundRequest {
    pub fn new(method: Method, body: impl Into<Bytes>) -> Self {
        Self {
            method,
            body: body.into(),
        }
    }
}

impl<S> FromRequest<S> for InboundRequest
where
    S: Send + Sync,
{
    type Rejection = BytesRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let method = req.method().clone();
        let body = Bytes::from_request(req, state).await?;
        Ok(Self { method, body })
    }
}

/// Correlation id for logging, or `"unknown"` when absent.
pub fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}
