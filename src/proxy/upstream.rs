//! Outbound call to the generative API.
//!
//! # Responsibilities
//! - Build the `generateContent` URL with the API key as a query parameter
//! - Perform exactly one POST and return status + raw body
//!
//! # Design Decisions
//! - `UpstreamClient` is the seam tests replace with a fake
//! - Transport error text never includes the request URL (it holds the key)

use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Bytes;
use axum::http::StatusCode;
use reqwest::header::CONTENT_TYPE;
use thiserror::Error;
use url::Url;

use crate::config::ApiKey;

/// What the upstream sent back, before any interpretation.
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub body: Bytes,
}

/// The outbound call could not produce a usable reply.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Connect failure, reset, timeout or body read failure.
    #[error("{0}")]
    Transport(String),

    /// The upstream replied, but not with JSON.
    #[error("upstream response is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        UpstreamError::Transport(error_chain(&err.without_url()))
    }
}

/// Flatten an error and its sources into one line.
///
/// `reqwest` keeps the interesting part ("connection refused") in the
/// source chain, not in the top-level message.
fn error_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

/// Performs the single outbound POST.
#[async_trait]
pub trait UpstreamClient: Send + Sync + 'static {
    /// POST `body` as `application/json` to `url`.
    async fn post_json(&self, url: Url, body: String) -> Result<UpstreamReply, UpstreamError>;
}

/// Production client over a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestUpstream {
    client: reqwest::Client,
}

impl ReqwestUpstream {
    /// Build a client. `timeout` of `None` keeps reqwest's default (no
    /// total request timeout).
    pub fn new(timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl UpstreamClient for ReqwestUpstream {
    async fn post_json(&self, url: Url, body: String) -> Result<UpstreamReply, UpstreamError> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        Ok(UpstreamReply { status, body })
    }
}

/// The fixed `generateContent` endpoint for one model.
#[derive(Clone)]
pub struct UpstreamEndpoint {
    url: Url,
}

impl UpstreamEndpoint {
    pub fn new(base_url: &str, model: &str) -> Result<Self, url::ParseError> {
        let url = Url::parse(&format!(
            "{}/models/{}:generateContent",
            base_url.trim_end_matches('/'),
            model
        ))?;
        Ok(Self { url })
    }

    /// Endpoint URL with `?key=<api key>` appended.
    pub fn with_key(&self, key: &ApiKey) -> Url {
        let mut url = self.url.clone();
        url.query_pairs_mut().append_pair("key", key.expose());
        url
    }

    /// Endpoint URL without the credential.
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

impl fmt::Debug for UpstreamEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UpstreamEndpoint").field(&self.as_str()).finish()
    }
}
