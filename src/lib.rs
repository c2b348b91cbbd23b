//! Fleet maintenance dashboard library.
//!
//! Request proxy, typed backend client, view-state derivation and the
//! dashboard controller that ties them together.

pub mod api;
pub mod config;
pub mod dashboard;
pub mod http;
pub mod lifecycle;
pub mod model;
pub mod observability;
pub mod resilience;
pub mod view;

pub use api::{ApiClient, ApiError, FleetApi};
pub use config::{DashboardConfig, UpstreamTarget};
pub use dashboard::DashboardController;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
