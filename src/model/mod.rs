//! Client-side copies of backend entities.
//!
//! The backend owns these records; the dashboard only holds the latest
//! fetched snapshot.

pub mod car;
pub mod service_record;

pub use car::{Car, CarCreate};
pub use service_record::{RecordId, ServiceRecord, ServiceRecordCreate};
