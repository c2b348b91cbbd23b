//! Dashboard controller and its dialog forms.

pub mod controller;
pub mod forms;

pub use controller::{DashboardController, DashboardState, Dialog};
pub use forms::{CarForm, FormError, ServiceForm};
