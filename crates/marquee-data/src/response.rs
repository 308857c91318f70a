//! HTTP response handling.

use crate::FetchError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;

/// An HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
    /// The HTTP status code.
    pub status: u16,
    /// The response headers.
    pub headers: HashMap<String, String>,
    /// The response body.
    pub body: Vec<u8>,
}

/// Error body shapes backends commonly return.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<ErrorField>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorField {
    Text(String),
    Object { message: String },
}

impl Response {
    /// Create a new response.
    pub fn new(status: u16, headers: HashMap<String, String>, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// A JSON response with the given status.
    pub fn json_body(status: u16, body: impl Into<Vec<u8>>) -> Self {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        Self::new(status, headers, body.into())
    }

    /// Check if the response was successful (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get the response body as text.
    pub fn text(&self) -> Result<String, FetchError> {
        String::from_utf8(self.body.clone())
            .map_err(|e| FetchError::ParseError(format!("Invalid UTF-8: {}", e)))
    }

    /// Parse the response body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        serde_json::from_slice(&self.body).map_err(|e| FetchError::ParseError(e.to_string()))
    }

    /// Get a header value, matched case-insensitively.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Best-effort human-readable error message from the body.
    ///
    /// Understands `{"error": "..."}`, `{"error": {"message": "..."}}` and
    /// `{"message": "..."}`; falls back to the raw text.
    pub fn error_message(&self) -> Option<String> {
        if let Ok(body) = serde_json::from_slice::<ErrorBody>(&self.body) {
            let message = match body.error {
                Some(ErrorField::Text(text)) => Some(text),
                Some(ErrorField::Object { message }) => Some(message),
                None => body.message,
            };
            if let Some(message) = message.filter(|m| !m.trim().is_empty()) {
                return Some(message);
            }
        }
        self.text()
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty() && !t.starts_with('{'))
    }

    /// Convert to a Result, returning an error for non-2xx status codes.
    pub fn error_for_status(self) -> Result<Self, FetchError> {
        if self.is_success() {
            Ok(self)
        } else {
            let message = self
                .error_message()
                .unwrap_or_else(|| "Unknown error".to_string());
            Err(FetchError::HttpError {
                status: self.status,
                message,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_response(status: u16, body: &[u8]) -> Response {
        Response::new(status, HashMap::new(), body.to_vec())
    }

    #[test]
    fn test_response_is_success() {
        assert!(make_response(200, b"").is_success());
        assert!(make_response(299, b"").is_success());
        assert!(!make_response(302, b"").is_success());
        assert!(!make_response(500, b"").is_success());
    }

    #[test]
    fn test_response_json() {
        #[derive(Deserialize, Debug, PartialEq)]
        struct Data {
            url: String,
        }

        let resp = Response::json_body(200, br#"{"url": "https://pay.example.com/s/1"}"#.to_vec());
        let data: Data = resp.json().unwrap();
        assert_eq!(data.url, "https://pay.example.com/s/1");
        assert_eq!(resp.header("content-type"), Some("application/json"));
    }

    #[test]
    fn test_error_message_shapes() {
        assert_eq!(
            make_response(400, br#"{"error": "Stripe is not configured"}"#).error_message(),
            Some("Stripe is not configured".to_string())
        );
        assert_eq!(
            make_response(400, br#"{"error": {"message": "card declined"}}"#).error_message(),
            Some("card declined".to_string())
        );
        assert_eq!(
            make_response(500, br#"{"message": "boom"}"#).error_message(),
            Some("boom".to_string())
        );
        assert_eq!(
            make_response(502, b"Bad Gateway").error_message(),
            Some("Bad Gateway".to_string())
        );
        assert_eq!(make_response(500, b"").error_message(), None);
        assert_eq!(make_response(500, br#"{"other": 1}"#).error_message(), None);
    }

    #[test]
    fn test_error_for_status() {
        assert!(make_response(200, b"OK").error_for_status().is_ok());

        match make_response(503, br#"{"error": "maintenance"}"#).error_for_status() {
            Err(FetchError::HttpError { status, message }) => {
                assert_eq!(status, 503);
                assert_eq!(message, "maintenance");
            }
            other => panic!("unexpected: {:?}", other),
        }

        match make_response(500, b"").error_for_status() {
            Err(FetchError::HttpError { message, .. }) => assert_eq!(message, "Unknown error"),
            other => panic!("unexpected: {:?}", other),
        }
    }
}
