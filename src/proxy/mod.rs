//! Proxy subsystem.
//!
//! # Data Flow
//! ```text
//! InboundRequest
//!     → handler.rs (method check, key check, JSON check)
//!     → upstream.rs (one POST to models/{model}:generateContent?key=...)
//!     → handler.rs (JSON check, status mapping)
//!     → ProxiedResponse
//! ```
//!
//! # Design Decisions
//! - No retries, no caching: every failure is answered immediately
//! - Upstream bodies are validated as JSON but relayed byte for byte

pub mod handler;
pub mod upstream;

pub use handler::{HandlerSettings, ProxyHandler};
pub use upstream::{ReqwestUpstream, UpstreamClient, UpstreamEndpoint, UpstreamError, UpstreamReply};
