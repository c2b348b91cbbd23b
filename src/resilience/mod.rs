//! Resilience helpers.
//!
//! No retry middleware, backoff or circuit breaking. The only second
//! attempt anywhere is the route fallback below.

pub mod fallback;

pub use fallback::{with_not_found_fallback, NotFound};
