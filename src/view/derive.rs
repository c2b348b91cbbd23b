//! Derived view state.
//!
//! Pure functions of the controller's state. Absent fields always count as
//! "unknown" and never trigger a condition on their own.

use chrono::NaiveDate;

use crate::model::{Car, ServiceRecord};
use crate::view::format::parse_date;

/// Distance added to the current mileage when the backend has no due mileage.
pub const DEFAULT_SERVICE_INTERVAL_KM: i64 = 10_000;

/// Cars whose reg number or model contains `query`, case-insensitively.
///
/// The query is trimmed first; an empty query keeps every car, in order.
pub fn filter_cars<'a>(cars: &'a [Car], query: &str) -> Vec<&'a Car> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return cars.iter().collect();
    }
    cars.iter()
        .filter(|car| {
            car.reg_number.to_lowercase().contains(&needle)
                || car.model.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Whether `car` is due for service as of `today`.
///
/// Overdue by mileage when `mileage >= next_service_due_km`, or by date when
/// the due date is strictly before `today`.
pub fn is_overdue(car: &Car, today: NaiveDate) -> bool {
    let due_by_km = matches!(
        (car.mileage, car.next_service_due_km),
        (Some(mileage), Some(due_km)) if mileage >= due_km
    );
    let due_by_date = car
        .next_service_due_date
        .as_deref()
        .and_then(parse_date)
        .is_some_and(|due| due < today);
    due_by_km || due_by_date
}

/// Records ordered by date, most recent first.
///
/// Dates compare as strings (ISO dates sort chronologically). A missing date
/// compares as `""` and so ends up last. The sort is stable.
pub fn sort_history(records: &[ServiceRecord]) -> Vec<&ServiceRecord> {
    let mut sorted: Vec<&ServiceRecord> = records.iter().collect();
    sorted.sort_by(|a, b| {
        let a = a.date.as_deref().unwrap_or("");
        let b = b.date.as_deref().unwrap_or("");
        b.cmp(a)
    });
    sorted
}

/// Mileage at which the next service should happen.
pub fn suggested_next_service_km(car: &Car) -> Option<i64> {
    car.next_service_due_km
        .or_else(|| car.mileage.map(|m| m + DEFAULT_SERVICE_INTERVAL_KM))
}
