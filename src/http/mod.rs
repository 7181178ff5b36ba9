//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware: request ID, tracing, body limit)
//!     → request.rs (reduce to InboundRequest)
//!     → proxy handler
//!     → response.rs (ProxiedResponse → axum Response)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{InboundRequest, X_REQUEST_ID};
pub use response::ProxiedResponse;
pub use server::HttpServer;
