//! Backend API access.
//!
//! # Data Flow
//! ```text
//! DashboardController
//!     → FleetApi (trait, mockable)
//!     → ApiClient (reqwest, JSON)
//!     → dashboard proxy /api/... → backend
//! ```

pub mod client;
pub mod error;

pub use client::{ApiClient, FleetApi, CLIENT_BASE_ENV};
pub use error::{ApiError, ApiResult};
