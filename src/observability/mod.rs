//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! proxy, client, controller
//!     → logging.rs (tracing subscriber, pretty or JSON)
//!     → metrics.rs (Prometheus counters and histograms)
//! ```
//!
//! Request IDs (`x-request-id`) are attached by the HTTP layer and appear in
//! every proxy log line.

pub mod logging;
pub mod metrics;

pub use logging::{init_cli_logging, init_logging};
