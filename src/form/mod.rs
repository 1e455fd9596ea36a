//! Form input and local validation
//!
//! Raw form fields as posted by the browser, and the checks that must pass
//! before anything is sent to the prediction service. Every failing check
//! is reported, not just the first.

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use crate::report::{build_prediction_id, Gender, RegistrationRequest};

pub const REGISTRATION_CODE_MAX_CHARS: usize = 20;
pub const LOOKUP_CODE_DIGITS: usize = 8;
pub const PHONE_MAX_CHARS: usize = 15;
pub const AGE_MAX: i64 = 120;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Prediction date must be a valid date (YYYY-MM-DD).")]
    InvalidDate,
    #[error("Prediction unique code is required.")]
    CodeRequired,
    #[error("Prediction unique code must be at most {0} characters.")]
    CodeTooLong(usize),
    #[error("Name is required.")]
    NameRequired,
    #[error("Age must be a whole number.")]
    AgeNotNumeric,
    #[error("Age must be greater than 0.")]
    AgeNotPositive,
    #[error("Age must be at most {0}.")]
    AgeTooHigh(i64),
    #[error("Gender must be one of M, F or O.")]
    InvalidGender,
    #[error("Phone number is required.")]
    PhoneRequired,
    #[error("Phone number must be at most {0} characters.")]
    PhoneTooLong(usize),
    #[error("Previous medication is required.")]
    MedicationRequired,
    #[error("Prediction code is required.")]
    LookupCodeRequired,
    #[error("Prediction code must be exactly {0} digits (0-9).")]
    LookupCodeFormat(usize),
}

/// Fields of the "Register Patient" form
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RegistrationForm {
    pub prediction_date: String,
    pub unique_code: String,
    pub name: String,
    pub age: String,
    pub gender: String,
    pub phone_no: String,
    pub previous_medication: String,
}

/// Fields of the "Get Report" form
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReportForm {
    pub prediction_date: String,
    pub code: String,
}

/// A registration that passed every local check
#[derive(Debug, Clone, PartialEq)]
pub struct ValidRegistration {
    pub date: NaiveDate,
    pub code: String,
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub phone_no: String,
    pub previous_medication: String,
}

impl ValidRegistration {
    pub fn prediction_id(&self) -> String {
        build_prediction_id(self.date, &self.code)
    }

    pub fn to_request(&self) -> RegistrationRequest {
        RegistrationRequest {
            prediction_id: self.prediction_id(),
            name: self.name.clone(),
            age: self.age,
            gender: self.gender,
            phone_no: self.phone_no.clone(),
            previous_medication: self.previous_medication.clone(),
        }
    }
}

/// A lookup that passed every local check
#[derive(Debug, Clone, PartialEq)]
pub struct ValidLookup {
    pub date: NaiveDate,
    pub code: String,
}

impl ValidLookup {
    pub fn prediction_id(&self) -> String {
        build_prediction_id(self.date, &self.code)
    }
}

/// Parse the date field; a blank field means `today`.
fn parse_date(raw: &str, today: NaiveDate) -> Result<NaiveDate, FormError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(today);
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| FormError::InvalidDate)
}

fn parse_age(raw: &str) -> Result<u32, FormError> {
    let raw = raw.trim();
    // An untouched age field posts nothing; treat it like the widget's 0.
    let age = if raw.is_empty() {
        0
    } else {
        raw.parse::<i64>().map_err(|_| FormError::AgeNotNumeric)?
    };
    if age <= 0 {
        return Err(FormError::AgeNotPositive);
    }
    if age > AGE_MAX {
        return Err(FormError::AgeTooHigh(AGE_MAX));
    }
    Ok(age as u32)
}

impl RegistrationForm {
    /// Empty form with the date preset to `today`.
    pub fn with_date(today: NaiveDate) -> Self {
        RegistrationForm {
            prediction_date: today.format(DATE_FORMAT).to_string(),
            gender: Gender::Male.code().to_string(),
            ..Default::default()
        }
    }

    pub fn validate(&self, today: NaiveDate) -> Result<ValidRegistration, Vec<FormError>> {
        let mut errors = Vec::new();

        let date = parse_date(&self.prediction_date, today).map_err(|e| errors.push(e)).ok();

        let code = self.unique_code.trim();
        if code.is_empty() {
            errors.push(FormError::CodeRequired);
        } else if code.chars().count() > REGISTRATION_CODE_MAX_CHARS {
            errors.push(FormError::CodeTooLong(REGISTRATION_CODE_MAX_CHARS));
        }

        let name = self.name.trim();
        if name.is_empty() {
            errors.push(FormError::NameRequired);
        }

        let age = parse_age(&self.age).map_err(|e| errors.push(e)).ok();

        let gender = self
            .gender
            .parse::<Gender>()
            .map_err(|_| errors.push(FormError::InvalidGender))
            .ok();

        let phone_no = self.phone_no.trim();
        if phone_no.is_empty() {
            errors.push(FormError::PhoneRequired);
        } else if phone_no.chars().count() > PHONE_MAX_CHARS {
            errors.push(FormError::PhoneTooLong(PHONE_MAX_CHARS));
        }

        let previous_medication = self.previous_medication.trim();
        if previous_medication.is_empty() {
            errors.push(FormError::MedicationRequired);
        }

        match (date, age, gender) {
            (Some(date), Some(age), Some(gender)) if errors.is_empty() => Ok(ValidRegistration {
                date,
                code: code.to_string(),
                name: name.to_string(),
                age,
                gender,
                phone_no: phone_no.to_string(),
                previous_medication: previous_medication.to_string(),
            }),
            _ => Err(errors),
        }
    }
}

impl ReportForm {
    pub fn with_date(today: NaiveDate) -> Self {
        ReportForm {
            prediction_date: today.format(DATE_FORMAT).to_string(),
            code: String::new(),
        }
    }

    pub fn validate(&self, today: NaiveDate) -> Result<ValidLookup, Vec<FormError>> {
        let mut errors = Vec::new();

        let date = parse_date(&self.prediction_date, today).map_err(|e| errors.push(e)).ok();

        let code = self.code.trim();
        if code.is_empty() {
            errors.push(FormError::LookupCodeRequired);
        } else if code.chars().count() != LOOKUP_CODE_DIGITS
            || !code.chars().all(|c| c.is_ascii_digit())
        {
            errors.push(FormError::LookupCodeFormat(LOOKUP_CODE_DIGITS));
        }

        match date {
            Some(date) if errors.is_empty() => Ok(ValidLookup {
                date,
                code: code.to_string(),
            }),
            _ => Err(errors),
        }
    }
}
