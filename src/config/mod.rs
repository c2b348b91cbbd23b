//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → DashboardConfig (validated, immutable)
//!
//! upstream.target + API_PROXY_TARGET / API_BASE_URL
//!     → upstream.rs (normalize to "<base>/api")
//!     → UpstreamTarget, passed to the proxy at startup
//! ```

pub mod loader;
pub mod schema;
pub mod upstream;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::{
    DashboardConfig, ListenerConfig, LogFormat, ObservabilityConfig, SecurityConfig,
    TimeoutConfig, UpstreamConfig,
};
pub use upstream::UpstreamTarget;
