//! Dialog form state and client-side validation.
//!
//! Fields hold raw user text; `validate` turns them into API payloads or
//! rejects them before any network call.

use chrono::NaiveDate;
use thiserror::Error;

use crate::model::{Car, CarCreate, ServiceRecordCreate};

/// Earliest release year accepted by the car form.
pub const MIN_RELEASE_YEAR: i32 = 1900;

/// Client-side rejection of a form submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Select a car before adding service records.")]
    NoCarSelected,

    #[error("Mileage must be a valid number.")]
    InvalidMileage,

    #[error("Cost must be a valid number.")]
    InvalidCost,

    #[error("Release year must be a valid number.")]
    InvalidReleaseYear,

    #[error("Date and service type are required.")]
    MissingServiceFields,

    #[error("Reg number and model are required.")]
    MissingCarFields,
}

/// Service record dialog fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceForm {
    pub date: String,
    pub kind: String,
    pub mileage: String,
    pub notes: String,
    pub cost: String,
}

impl ServiceForm {
    /// Fresh form: today's date, mileage prefilled from `car`.
    pub fn blank(car: Option<&Car>, today: NaiveDate) -> Self {
        Self {
            date: today.format("%Y-%m-%d").to_string(),
            kind: String::new(),
            mileage: car
                .and_then(|c| c.mileage)
                .map(|m| m.to_string())
                .unwrap_or_default(),
            notes: String::new(),
            cost: String::new(),
        }
    }

    pub fn validate(&self) -> Result<ServiceRecordCreate, FormError> {
        let mileage = parse_non_negative_int(&self.mileage).ok_or(FormError::InvalidMileage)?;
        let cost = parse_non_negative_amount(&self.cost).ok_or(FormError::InvalidCost)?;

        let date = self.date.trim();
        let kind = self.kind.trim();
        if date.is_empty() || kind.is_empty() {
            return Err(FormError::MissingServiceFields);
        }

        let notes = self.notes.trim();
        Ok(ServiceRecordCreate {
            date: date.to_string(),
            kind: kind.to_string(),
            mileage,
            notes: (!notes.is_empty()).then(|| notes.to_string()),
            cost,
        })
    }
}

/// Car dialog fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarForm {
    pub reg_number: String,
    pub model: String,
    pub mileage: String,
    pub release_year: String,
    pub owner: String,
}

impl CarForm {
    /// Blank optional fields are omitted from the payload.
    pub fn validate(&self) -> Result<CarCreate, FormError> {
        let mileage = optional(&self.mileage)
            .map(|raw| parse_non_negative_int(raw).ok_or(FormError::InvalidMileage))
            .transpose()?;

        let release_year = optional(&self.release_year)
            .map(|raw| {
                raw.parse::<i32>()
                    .ok()
                    .filter(|year| *year >= MIN_RELEASE_YEAR)
                    .ok_or(FormError::InvalidReleaseYear)
            })
            .transpose()?;

        let reg_number = self.reg_number.trim();
        let model = self.model.trim();
        if reg_number.is_empty() || model.is_empty() {
            return Err(FormError::MissingCarFields);
        }

        Ok(CarCreate {
            reg_number: reg_number.to_string(),
            model: model.to_string(),
            mileage,
            release_year,
            owner: optional(&self.owner).map(String::from),
        })
    }
}

fn optional(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn parse_non_negative_int(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|v| *v >= 0)
}

fn parse_non_negative_amount(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    fn valid_service_form() -> ServiceForm {
        ServiceForm {
            date: "2026-10-01".into(),
            kind: "  Oil change ".into(),
            mileage: "42000".into(),
            notes: "  ".into(),
            cost: "89.90".into(),
        }
    }

    #[test]
    fn test_blank_service_form_prefills() {
        let mut car = Car::new(1, "AB-123", "Volvo");
        car.mileage = Some(41_250);
        let form = ServiceForm::blank(Some(&car), today());
        assert_eq!(form.date, "2026-10-17");
        assert_eq!(form.mileage, "41250");
        assert!(form.kind.is_empty());

        let form = ServiceForm::blank(None, today());
        assert!(form.mileage.is_empty());
    }

    #[test]
    fn test_service_form_trims_and_drops_blank_notes() {
        let payload = valid_service_form().validate().unwrap();
        assert_eq!(payload.kind, "Oil change");
        assert_eq!(payload.mileage, 42_000);
        assert_eq!(payload.notes, None);
        assert!((payload.cost - 89.9).abs() < f64::EPSILON);
    }

    #[test]
    fn test_service_form_rejects_bad_numbers() {
        let mut form = valid_service_form();
        form.mileage = "-5".into();
        assert_eq!(form.validate(), Err(FormError::InvalidMileage));

        form.mileage = "lots".into();
        assert_eq!(form.validate(), Err(FormError::InvalidMileage));

        form.mileage = "100".into();
        form.cost = "-1".into();
        assert_eq!(form.validate(), Err(FormError::InvalidCost));

        form.cost = "".into();
        assert_eq!(form.validate(), Err(FormError::InvalidCost));
    }

    #[test]
    fn test_service_form_requires_type() {
        let mut form = valid_service_form();
        form.kind = "   ".into();
        assert_eq!(form.validate(), Err(FormError::MissingServiceFields));
        assert_eq!(
            FormError::MissingServiceFields.to_string(),
            "Date and service type are required."
        );
    }

    #[test]
    fn test_car_form_optional_fields() {
        let form = CarForm {
            reg_number: " CAT-0001 ".into(),
            model: "Toyota Hilux 2.8D".into(),
            mileage: "".into(),
            release_year: " ".into(),
            owner: "".into(),
        };
        let payload = form.validate().unwrap();
        assert_eq!(payload.reg_number, "CAT-0001");
        assert_eq!(payload.mileage, None);
        assert_eq!(payload.release_year, None);
        assert_eq!(payload.owner, None);
    }

    #[test]
    fn test_car_form_validation_order() {
        let mut form = CarForm {
            reg_number: "".into(),
            model: "".into(),
            mileage: "-1".into(),
            release_year: "1899".into(),
            owner: "".into(),
        };
        assert_eq!(form.validate(), Err(FormError::InvalidMileage));

        form.mileage = "10".into();
        assert_eq!(form.validate(), Err(FormError::InvalidReleaseYear));

        form.release_year = "1900".into();
        assert_eq!(form.validate(), Err(FormError::MissingCarFields));

        form.reg_number = "CAT-0002".into();
        form.model = "Land Cruiser".into();
        let payload = form.validate().unwrap();
        assert_eq!(payload.release_year, Some(1900));
        assert_eq!(payload.mileage, Some(10));
    }
}
