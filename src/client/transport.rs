use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

/// Raw reply from the remote service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        TransportResponse {
            status,
            body: body.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("{0}")]
    Connect(String),
    #[error("request timed out after {0}s")]
    Timeout(u64),
    #[error("{0}")]
    Other(String),
}

/// Sends one JSON request and hands back status + body. Implementations
/// block until the reply arrives or the timeout expires.
pub trait Transport {
    fn post_json(&self, url: &str, body: &Value) -> Result<TransportResponse, TransportError>;
}

/// Blocking HTTP transport over `reqwest`.
///
/// The client is built per request so it is created and dropped on the
/// blocking thread that makes the call.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Self {
        HttpTransport { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Transport for HttpTransport {
    fn post_json(&self, url: &str, body: &Value) -> Result<TransportResponse, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;

        let response = client.post(url).json(body).send().map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout(self.timeout.as_secs())
            } else if e.is_connect() {
                TransportError::Connect(e.to_string())
            } else {
                TransportError::Other(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| TransportError::Other(e.to_string()))?;

        Ok(TransportResponse { status, body })
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned replies in order and records every request.
    #[derive(Default)]
    pub(crate) struct ScriptedTransport {
        replies: Mutex<VecDeque<Result<TransportResponse, TransportError>>>,
        requests: Mutex<Vec<(String, Value)>>,
    }

    impl ScriptedTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn reply(self, status: u16, body: &str) -> Self {
            self.replies
                .lock()
                .unwrap()
                .push_back(Ok(TransportResponse::new(status, body)));
            self
        }

        pub fn fail(self, error: TransportError) -> Self {
            self.replies.lock().unwrap().push_back(Err(error));
            self
        }

        pub fn requests(&self) -> Vec<(String, Value)> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl Transport for ScriptedTransport {
        fn post_json(&self, url: &str, body: &Value) -> Result<TransportResponse, TransportError> {
            self.requests
                .lock()
                .unwrap()
                .push((url.to_string(), body.clone()));
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::Other("no scripted reply".to_string())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::ScriptedTransport;
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_http_transport_keeps_timeout() {
        let transport = HttpTransport::new(Duration::from_secs(10));
        assert_eq!(transport.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_scripted_transport_replays_in_order() {
        let transport = ScriptedTransport::new()
            .reply(200, "{}")
            .fail(TransportError::Timeout(10));

        let first = transport.post_json("http://api/register", &json!({"a": 1})).unwrap();
        assert_eq!(first, TransportResponse::new(200, "{}"));
        assert!(matches!(
            transport.post_json("http://api/register", &json!({})),
            Err(TransportError::Timeout(10))
        ));
        assert_eq!(transport.requests().len(), 2);
    }

    #[test]
    fn test_unreachable_host_is_a_transport_error() {
        // Port 9 on localhost is expected to refuse connections.
        let transport = HttpTransport::new(Duration::from_secs(2));
        match transport.post_json("http://127.0.0.1:9/register", &json!({})) {
            Err(TransportError::Connect(cause)) => assert!(!cause.is_empty()),
            Err(_) => {}
            Ok(response) => panic!("unexpected reply: {:?}", response),
        }
    }
}
