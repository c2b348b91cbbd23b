//! View-state derivation and formatting.

pub mod derive;
pub mod format;

pub use derive::{filter_cars, is_overdue, sort_history, suggested_next_service_km};
pub use format::{format_cost, format_date, format_mileage, overdue_badge};
