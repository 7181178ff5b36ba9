//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!
//! environment (api_key_env)
//!     → ApiKey, read once at startup
//!     → injected into the proxy handler
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - The handler never reads the environment itself

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ApiKey, ConfigError};
pub use schema::{
    ListenerConfig, LogFormat, ObservabilityConfig, ProxyConfig, SecurityConfig, UpstreamConfig,
};
pub use validation::{validate_config, ValidationError};
