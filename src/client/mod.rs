//! Prediction service client
//!
//! Talks to the two remote endpoints (patient registration and report
//! lookup) through a [`Transport`] and maps status codes to [`ApiError`].

pub mod transport;

pub use transport::{HttpTransport, Transport, TransportError, TransportResponse};

use serde_json::{json, Value};
use thiserror::Error;

use crate::config::ApiConfig;
use crate::report::{RegistrationRequest, Report};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("bad request: {message}")]
    BadRequest { message: String },
    #[error("prediction not found: {message}")]
    NotFound { message: String },
    #[error("patient already registered: {message}")]
    AlreadyRegistered { message: String },
    #[error("patient not registered: {message}")]
    NotRegistered { message: String },
    #[error("unexpected HTTP status {status}")]
    UnexpectedStatus { status: u16, body: String },
    #[error("Failed to connect to backend API: {0}")]
    Transport(#[from] TransportError),
    #[error("server returned a non-JSON response")]
    MalformedResponse { raw: String },
    #[error("server returned a report that is not a record")]
    UnexpectedReport { raw: String },
}

pub struct ApiClient<T: Transport> {
    transport: T,
    register_url: String,
    report_url: String,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T, api: &ApiConfig) -> Self {
        ApiClient {
            transport,
            register_url: api.register_url(),
            report_url: api.report_url(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Attach patient details to an existing prediction. Returns the saved
    /// record (an empty object when the service sends none).
    pub fn register(&self, request: &RegistrationRequest) -> Result<Value, ApiError> {
        let payload = serde_json::to_value(request).map_err(|e| ApiError::BadRequest {
            message: e.to_string(),
        })?;
        let response = self.transport.post_json(&self.register_url, &payload)?;
        tracing::info!(
            prediction_id = %request.prediction_id,
            status = response.status,
            "registration response"
        );

        let data = serde_json::from_str::<Value>(&response.body).unwrap_or_else(|_| {
            json!({
                "error": "Non-JSON response from server",
                "raw_text": response.body,
            })
        });

        match response.status {
            200 => Ok(data
                .get("record")
                .filter(|record| !record.is_null())
                .cloned()
                .unwrap_or_else(|| json!({}))),
            400 => Err(ApiError::BadRequest {
                message: error_message(&data),
            }),
            404 => Err(ApiError::NotFound {
                message: error_message(&data),
            }),
            409 => Err(ApiError::AlreadyRegistered {
                message: error_message(&data),
            }),
            status => Err(ApiError::UnexpectedStatus {
                status,
                body: data.to_string(),
            }),
        }
    }

    /// Fetch the full report for `prediction_id`.
    pub fn fetch_report(&self, prediction_id: &str) -> Result<Report, ApiError> {
        let payload = json!({ "prediction_id": prediction_id });
        let response = self.transport.post_json(&self.report_url, &payload)?;
        tracing::info!(prediction_id, status = response.status, "report response");

        let data = serde_json::from_str::<Value>(&response.body).map_err(|_| {
            ApiError::MalformedResponse {
                raw: response.body.clone(),
            }
        })?;

        match response.status {
            200 => {
                let report = data.get("report").cloned().unwrap_or_else(|| json!({}));
                let report = if report.is_null() { json!({}) } else { report };
                serde_json::from_value(report).map_err(|e| {
                    tracing::warn!(prediction_id, error = %e, "report record did not match the expected shape");
                    ApiError::UnexpectedReport {
                        raw: response.body.clone(),
                    }
                })
            }
            400 => Err(ApiError::BadRequest {
                message: error_message(&data),
            }),
            403 => Err(ApiError::NotRegistered {
                message: error_message(&data),
            }),
            404 => Err(ApiError::NotFound {
                message: error_message(&data),
            }),
            status => Err(ApiError::UnexpectedStatus {
                status,
                body: data.to_string(),
            }),
        }
    }
}

/// The `error` field of a reply body, or an empty string.
fn error_message(data: &Value) -> String {
    match data.get("error") {
        Some(Value::String(message)) => message.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::transport::mock::ScriptedTransport;
    use super::*;
    use crate::report::{ConditionStatus, Condition, Gender};
    use pretty_assertions::assert_eq;

    fn client(transport: ScriptedTransport) -> ApiClient<ScriptedTransport> {
        let api = ApiConfig {
            base_url: "http://backend/".to_string(),
            ..ApiConfig::default()
        };
        ApiClient::new(transport, &api)
    }

    fn request() -> RegistrationRequest {
        RegistrationRequest {
            prediction_id: "2025-11-25-12345678".to_string(),
            name: "Asha Rao".to_string(),
            age: 54,
            gender: Gender::Female,
            phone_no: "9876543210".to_string(),
            previous_medication: "Aspirin".to_string(),
        }
    }

    #[test]
    fn test_register_success_returns_record() {
        let c = client(ScriptedTransport::new().reply(200, r#"{"record": {"name": "Asha Rao"}}"#));
        let record = c.register(&request()).unwrap();
        assert_eq!(record, json!({"name": "Asha Rao"}));

        let requests = c.transport().requests();
        assert_eq!(requests[0].0, "http://backend/register");
        assert_eq!(requests[0].1["prediction_id"], json!("2025-11-25-12345678"));
        assert_eq!(requests[0].1["gender"], json!("F"));
    }

    #[test]
    fn test_register_status_mapping() {
        let c = client(
            ScriptedTransport::new()
                .reply(400, r#"{"error": "missing name"}"#)
                .reply(404, r#"{"error": "no such prediction"}"#)
                .reply(409, r#"{"error": "duplicate"}"#)
                .reply(500, r#"{"detail": "boom"}"#),
        );
        assert!(matches!(c.register(&request()), Err(ApiError::BadRequest { message }) if message == "missing name"));
        assert!(matches!(c.register(&request()), Err(ApiError::NotFound { message }) if message == "no such prediction"));
        assert!(matches!(c.register(&request()), Err(ApiError::AlreadyRegistered { message }) if message == "duplicate"));
        assert!(matches!(c.register(&request()), Err(ApiError::UnexpectedStatus { status: 500, .. })));
    }

    #[test]
    fn test_register_non_json_body_falls_back() {
        let c = client(
            ScriptedTransport::new()
                .reply(200, "OK")
                .reply(404, "<html>not found</html>"),
        );
        assert_eq!(c.register(&request()).unwrap(), json!({}));
        match c.register(&request()) {
            Err(ApiError::NotFound { message }) => assert_eq!(message, "Non-JSON response from server"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_register_transport_failure() {
        let c = client(ScriptedTransport::new().fail(TransportError::Connect("connection refused".into())));
        let err = c.register(&request()).unwrap_err();
        assert!(matches!(err, ApiError::Transport(TransportError::Connect(_))));
        assert_eq!(err.to_string(), "Failed to connect to backend API: connection refused");
    }

    #[test]
    fn test_fetch_report_success() {
        let c = client(ScriptedTransport::new().reply(
            200,
            r#"{"report": {"prediction_id": "2025-11-25-12345678", "samples": [1, 2],
                "results": {"is_afib": true}}}"#,
        ));
        let report = c.fetch_report("2025-11-25-12345678").unwrap();
        assert_eq!(report.prediction_id.as_deref(), Some("2025-11-25-12345678"));
        assert_eq!(report.results.status(Condition::AtrialFibrillation), ConditionStatus::Detected);

        let requests = c.transport().requests();
        assert_eq!(requests[0].0, "http://backend/get_report");
        assert_eq!(requests[0].1, json!({"prediction_id": "2025-11-25-12345678"}));
    }

    #[test]
    fn test_fetch_report_status_mapping() {
        let c = client(
            ScriptedTransport::new()
                .reply(400, r#"{"error": "prediction_id is required"}"#)
                .reply(403, r#"{"error": "not registered"}"#)
                .reply(404, r#"{"error": "not found"}"#)
                .reply(502, r#"{}"#),
        );
        assert!(matches!(c.fetch_report("x"), Err(ApiError::BadRequest { .. })));
        assert!(matches!(c.fetch_report("x"), Err(ApiError::NotRegistered { message }) if message == "not registered"));
        assert!(matches!(c.fetch_report("x"), Err(ApiError::NotFound { .. })));
        assert!(matches!(c.fetch_report("x"), Err(ApiError::UnexpectedStatus { status: 502, .. })));
    }

    #[test]
    fn test_fetch_report_non_json_body() {
        let c = client(ScriptedTransport::new().reply(200, "Internal Server Error"));
        match c.fetch_report("x") {
            Err(ApiError::MalformedResponse { raw }) => assert_eq!(raw, "Internal Server Error"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_fetch_report_tolerates_field_types() {
        let c = client(
            ScriptedTransport::new()
                .reply(200, r#"{"report": {"results": {"is_mci": 1}}}"#)
                .reply(200, r#"{"report": {"age": "54", "gender": "Male"}}"#)
                .reply(200, r#"{"report": {"age": 54.0, "timestamp": 1732528800}}"#),
        );

        let report = c.fetch_report("x").unwrap();
        assert_eq!(report.results.status(Condition::MyocardialIschemia), ConditionStatus::Unknown);

        let report = c.fetch_report("x").unwrap();
        assert_eq!((report.age_or_na(), report.gender_or_na()), ("54", "Male"));

        let report = c.fetch_report("x").unwrap();
        assert_eq!((report.age_or_na(), report.timestamp_or_na()), ("54.0", "1732528800"));
    }

    #[test]
    fn test_fetch_report_that_is_not_a_record() {
        let c = client(ScriptedTransport::new().reply(200, r#"{"report": ["pending"]}"#));
        match c.fetch_report("x") {
            Err(ApiError::UnexpectedReport { raw }) => assert_eq!(raw, r#"{"report": ["pending"]}"#),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_fetch_report_missing_report_key_is_empty_report() {
        let c = client(ScriptedTransport::new().reply(200, "{}"));
        assert_eq!(c.fetch_report("x").unwrap(), Report::default());
    }
}
