//! ECG prediction report records
//!
//! Types for the records exchanged with the prediction service:
//! - Report records returned by the lookup endpoint
//! - Prediction identifiers shared by registration and lookup
//! - Sample normalization for plotting and document embedding
//! - Tri-state condition flags

pub mod conditions;
pub mod identifier;
mod lenient;
pub mod samples;

pub use conditions::{Condition, ConditionResults, ConditionStatus};
pub use identifier::build_prediction_id;
pub use samples::{normalize_samples, ToList};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Placeholder shown for any field the service left out
pub const NOT_AVAILABLE: &str = "N/A";

/// Placeholder for an absent or blank medication history
pub const NOT_PROVIDED: &str = "Not provided";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "O")]
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn code(&self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
            Gender::Other => "O",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "M" => Ok(Gender::Male),
            "F" => Ok(Gender::Female),
            "O" => Ok(Gender::Other),
            other => Err(format!("Unknown gender: {}", other)),
        }
    }
}

/// A patient + prediction record as returned by the lookup endpoint.
///
/// Every field is optional on the wire. Display fields keep whatever scalar
/// the service sent as text, so a type mismatch never loses the record;
/// `samples` is kept as raw JSON and only interpreted through
/// [`normalize_samples`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    #[serde(default, deserialize_with = "lenient::text")]
    pub prediction_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub timestamp: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub age: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub phone_no: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub previous_medication: Option<String>,
    #[serde(default)]
    pub samples: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "lenient::results")]
    pub results: ConditionResults,
}

impl Report {
    pub fn prediction_id_or_na(&self) -> &str {
        self.prediction_id.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    pub fn timestamp_or_na(&self) -> &str {
        self.timestamp.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    pub fn name_or_na(&self) -> &str {
        self.name.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    pub fn age_or_na(&self) -> &str {
        self.age.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    pub fn gender_or_na(&self) -> &str {
        self.gender.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    pub fn phone_or_na(&self) -> &str {
        self.phone_no.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    /// Medication history, or "Not provided" when absent or empty.
    pub fn medication_text(&self) -> &str {
        match self.previous_medication.as_deref() {
            Some(text) if !text.is_empty() => text,
            _ => NOT_PROVIDED,
        }
    }

    pub fn normalized_samples(&self) -> Option<Vec<f64>> {
        normalize_samples(self.samples.as_ref())
    }

    /// File name offered for the downloadable PDF.
    pub fn pdf_file_name(&self) -> String {
        format!(
            "ecgenius_report_{}.pdf",
            self.prediction_id.as_deref().unwrap_or("unknown")
        )
    }
}

/// Body sent to the registration endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub prediction_id: String,
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub phone_no: String,
    pub previous_medication: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_report_from_full_record() {
        let report: Report = serde_json::from_value(json!({
            "prediction_id": "2025-11-25-12345678",
            "timestamp": "2025-11-25T10:00:00Z",
            "name": "Asha Rao",
            "age": 54,
            "gender": "F",
            "phone_no": "9876543210",
            "previous_medication": "Aspirin 75mg",
            "samples": "[0.1, 0.2]",
            "results": {"is_mci": true, "is_afib": false, "is_bbb": null}
        }))
        .unwrap();

        assert_eq!(report.gender_or_na(), "F");
        assert_eq!(report.age_or_na(), "54");
        assert_eq!(report.normalized_samples(), Some(vec![0.1, 0.2]));
        assert_eq!(report.pdf_file_name(), "ecgenius_report_2025-11-25-12345678.pdf");
        assert_eq!(
            report.results.status(Condition::VentricularFibrillation),
            ConditionStatus::Unknown
        );
    }

    #[test]
    fn test_empty_record_uses_placeholders() {
        let report: Report = serde_json::from_value(json!({})).unwrap();
        assert_eq!(report.prediction_id_or_na(), "N/A");
        assert_eq!(report.age_or_na(), "N/A");
        assert_eq!(report.gender_or_na(), "N/A");
        assert_eq!(report.medication_text(), "Not provided");
        assert_eq!(report.pdf_file_name(), "ecgenius_report_unknown.pdf");
        assert!(report.normalized_samples().is_none());
    }

    #[test]
    fn test_blank_medication_is_not_provided() {
        let report = Report {
            previous_medication: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(report.medication_text(), "Not provided");
    }

    #[test]
    fn test_gender_round_trips_through_code() {
        for gender in Gender::ALL {
            assert_eq!(gender.code().parse::<Gender>(), Ok(gender));
        }
        assert!("X".parse::<Gender>().is_err());
    }

    #[test]
    fn test_registration_request_wire_shape() {
        let request = RegistrationRequest {
            prediction_id: "2025-11-25-ABC".to_string(),
            name: "Asha Rao".to_string(),
            age: 54,
            gender: Gender::Other,
            phone_no: "9876543210".to_string(),
            previous_medication: "None".to_string(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["gender"], json!("O"));
        assert_eq!(value["age"], json!(54));
    }
}
