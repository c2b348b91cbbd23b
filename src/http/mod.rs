//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! Browser / fleet-cli
//!     → server.rs (Axum router, request ID, trace span, timeout)
//!     → proxy.rs (rewrite /api/<path>?<query> onto the upstream base)
//!     → backend API
//!     → proxy.rs (status, headers, body stream passed back)
//! ```

pub mod proxy;
pub mod request;
pub mod server;

pub use proxy::{proxy_handler, ProxyError, ProxyState};
pub use request::{MakeUuidRequestId, X_REQUEST_ID};
pub use server::HttpServer;
