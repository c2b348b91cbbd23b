//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown::trigger() ─┐
//! SIGINT / SIGTERM  ───┴─▶ wait_for_shutdown ─▶ axum graceful shutdown ─▶ exit
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::{wait_for_shutdown, Shutdown};
