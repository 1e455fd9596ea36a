//! Page controller
//!
//! Runs one form submission end to end: validate locally, build the
//! prediction id, make a single call to the prediction service, and hand
//! back an outcome for the view layer. Calls block; run them off the async
//! executor.

use chrono::NaiveDate;
use serde_json::Value;

use crate::client::{ApiClient, ApiError, Transport};
use crate::document::{build_document, DocumentError};
use crate::form::{FormError, RegistrationForm, ReportForm};
use crate::report::Report;

#[derive(Debug)]
pub enum RegistrationOutcome {
    Invalid(Vec<FormError>),
    Registered { prediction_id: String, record: Value },
    Rejected { prediction_id: String, error: ApiError },
}

#[derive(Debug)]
pub enum LookupOutcome {
    Invalid(Vec<FormError>),
    Found {
        prediction_id: String,
        report: Box<Report>,
        pdf: Result<Vec<u8>, DocumentError>,
    },
    Rejected { prediction_id: String, error: ApiError },
}

pub struct PageController<T: Transport> {
    client: ApiClient<T>,
}

impl<T: Transport> PageController<T> {
    pub fn new(client: ApiClient<T>) -> Self {
        PageController { client }
    }

    pub fn client(&self) -> &ApiClient<T> {
        &self.client
    }

    pub fn register(&self, form: &RegistrationForm, today: NaiveDate) -> RegistrationOutcome {
        let valid = match form.validate(today) {
            Ok(valid) => valid,
            Err(errors) => {
                tracing::info!(errors = errors.len(), "registration form rejected");
                return RegistrationOutcome::Invalid(errors);
            }
        };

        let request = valid.to_request();
        let prediction_id = request.prediction_id.clone();
        match self.client.register(&request) {
            Ok(record) => RegistrationOutcome::Registered {
                prediction_id,
                record,
            },
            Err(error) => {
                tracing::warn!(%prediction_id, %error, "registration failed");
                RegistrationOutcome::Rejected {
                    prediction_id,
                    error,
                }
            }
        }
    }

    pub fn lookup(&self, form: &ReportForm, today: NaiveDate) -> LookupOutcome {
        let valid = match form.validate(today) {
            Ok(valid) => valid,
            Err(errors) => {
                tracing::info!(errors = errors.len(), "report form rejected");
                return LookupOutcome::Invalid(errors);
            }
        };

        let prediction_id = valid.prediction_id();
        match self.client.fetch_report(&prediction_id) {
            Ok(report) => {
                let pdf = build_document(&report);
                if let Err(error) = &pdf {
                    tracing::warn!(%prediction_id, %error, "failed to build PDF report");
                }
                LookupOutcome::Found {
                    prediction_id,
                    report: Box::new(report),
                    pdf,
                }
            }
            Err(error) => {
                tracing::warn!(%prediction_id, %error, "report lookup failed");
                LookupOutcome::Rejected {
                    prediction_id,
                    error,
                }
            }
        }
    }
}
