//! Gemini API key-injecting proxy.
//!
//! Accepts a JSON POST from a browser or other client, forwards it to the
//! Gemini `generateContent` endpoint with a server-held API key, and relays
//! the upstream status and body back unchanged.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod proxy;

pub use config::schema::ProxyConfig;
pub use error::{ProxyError, ServerError};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use proxy::ProxyHandler;
