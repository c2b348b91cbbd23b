//! Car snapshot and creation payload.

use serde::{Deserialize, Serialize};

/// A vehicle as returned by the backend.
///
/// Optional attributes may be missing or `null` on the wire; both read as
/// `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    pub id: i64,
    pub reg_number: String,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mileage: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_service_due_km: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_service_due_date: Option<String>,
}

impl Car {
    /// Minimal car with only the required fields set.
    pub fn new(id: i64, reg_number: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            id,
            reg_number: reg_number.into(),
            model: model.into(),
            owner: None,
            release_year: None,
            mileage: None,
            created_at: None,
            next_service_due_km: None,
            next_service_due_date: None,
        }
    }
}

/// Body of a car creation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarCreate {
    pub reg_number: String,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mileage: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_and_missing_are_none() {
        let car: Car = serde_json::from_value(json!({
            "id": 7,
            "regNumber": "AB-123",
            "model": "Volvo V70",
            "mileage": null,
            "createdAt": "2025-03-01T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(car.mileage, None);
        assert_eq!(car.owner, None);
        assert_eq!(car.created_at.as_deref(), Some("2025-03-01T10:00:00Z"));
    }

    #[test]
    fn test_create_omits_absent_fields() {
        let payload = CarCreate {
            reg_number: "XY-999".into(),
            model: "Skoda Octavia".into(),
            mileage: Some(1500),
            release_year: None,
            owner: None,
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value,
            json!({ "regNumber": "XY-999", "model": "Skoda Octavia", "mileage": 1500 })
        );
    }
}
