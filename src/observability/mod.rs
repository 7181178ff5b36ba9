//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Proxy handler and middleware produce:
//!     → tracing events (structured, with request_id span field)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → logging.rs subscriber (stdout, pretty or JSON)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - The handler only emits events; where they go is decided at startup
//! - Request ID flows from the middleware into every handler event
//! - Metric updates are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
