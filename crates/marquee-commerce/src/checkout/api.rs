//! Remote commerce API contract.

use crate::checkout::{CheckoutError, CheckoutLineItem};
use crate::ids::CheckoutSessionId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from the remote commerce API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The backend could not be reached.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The backend answered with an error.
    #[error("API error ({status}): {message}")]
    Application { status: u16, message: String },

    /// The backend answered with a body we cannot read.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// The backend's message, if it sent one.
    pub fn message(&self) -> &str {
        match self {
            ApiError::Transport(message)
            | ApiError::Application { message, .. }
            | ApiError::InvalidResponse(message) => message,
        }
    }
}

impl From<ApiError> for CheckoutError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::InvalidResponse(_) => CheckoutError::SessionMissingRedirect,
            other => CheckoutError::SessionCreationFailed(other.message().to_string()),
        }
    }
}

/// Body of the create-session call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub items: Vec<CheckoutLineItem>,
    pub success_url: String,
    pub cancel_url: String,
}

/// The create-session response as it arrives, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSessionResponse {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl RawSessionResponse {
    /// Parse a response body.
    ///
    /// Some backends wrap the object in a JSON string; both forms are accepted.
    pub fn from_body(body: &[u8]) -> Result<Self, ApiError> {
        let value: serde_json::Value = serde_json::from_slice(body)
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
        let value = match value {
            serde_json::Value::String(inner) => serde_json::from_str(&inner)
                .map_err(|e| ApiError::InvalidResponse(e.to_string()))?,
            other => other,
        };
        serde_json::from_value(value).map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    /// Validate into a session that can be redirected to.
    pub fn into_session(self) -> Result<CheckoutSession, CheckoutError> {
        let redirect_url = self
            .url
            .map(|u| u.trim().to_string())
            .filter(|u| is_absolute_http(u))
            .ok_or(CheckoutError::SessionMissingRedirect)?;

        let session_id = self
            .session_id
            .map(CheckoutSessionId::new)
            .filter(|id| !id.is_blank());

        Ok(CheckoutSession {
            session_id,
            redirect_url,
        })
    }
}

fn is_absolute_http(url: &str) -> bool {
    match url.parse::<http::Uri>() {
        Ok(uri) => {
            matches!(uri.scheme_str(), Some("http") | Some("https")) && uri.host().is_some()
        }
        Err(_) => false,
    }
}

/// A created checkout session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSession {
    /// Provider session id; not every backend returns it.
    pub session_id: Option<CheckoutSessionId>,
    /// Where to send the browser.
    pub redirect_url: String,
}

/// Details of a completed payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDetails {
    /// Amount charged, minor units.
    pub amount_total_minor: i64,
    /// Lower-case ISO code.
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
}

/// Outcome of a checkout session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SessionStatus {
    Completed(PaymentDetails),
    Failed {
        #[serde(default)]
        reason: String,
    },
}

/// The remote commerce backend.
#[async_trait(?Send)]
pub trait CommerceApi {
    /// Whether the platform has a payment provider set up.
    async fn is_payment_provider_configured(&self) -> Result<bool, ApiError>;

    /// Create a payment session for `request`.
    async fn create_checkout_session(
        &self,
        request: &CreateSessionRequest,
    ) -> Result<RawSessionResponse, ApiError>;

    /// Look up how a session ended.
    async fn get_session_status(
        &self,
        session_id: &CheckoutSessionId,
    ) -> Result<SessionStatus, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_requires_redirect() {
        let missing = RawSessionResponse {
            session_id: Some("cs_1".to_string()),
            url: None,
        };
        assert_eq!(
            missing.into_session(),
            Err(CheckoutError::SessionMissingRedirect)
        );

        let empty = RawSessionResponse {
            session_id: Some("cs_1".to_string()),
            url: Some("  ".to_string()),
        };
        assert_eq!(empty.into_session(), Err(CheckoutError::SessionMissingRedirect));

        let relative = RawSessionResponse {
            session_id: None,
            url: Some("/pay/cs_1".to_string()),
        };
        assert_eq!(
            relative.into_session(),
            Err(CheckoutError::SessionMissingRedirect)
        );
    }

    #[test]
    fn test_session_without_id_is_accepted() {
        let session = RawSessionResponse {
            session_id: None,
            url: Some("https://pay.example.com/c/cs_1".to_string()),
        }
        .into_session()
        .unwrap();
        assert_eq!(session.redirect_url, "https://pay.example.com/c/cs_1");
        assert!(session.session_id.is_none());
    }

    #[test]
    fn test_from_body_accepts_wrapped_json() {
        let plain = RawSessionResponse::from_body(
            br#"{"sessionId":"cs_1","url":"https://pay.example.com/c/cs_1","extra":1}"#,
        )
        .unwrap();
        let wrapped = RawSessionResponse::from_body(
            br#""{\"sessionId\":\"cs_1\",\"url\":\"https://pay.example.com/c/cs_1\"}""#,
        )
        .unwrap();
        assert_eq!(plain, wrapped);
        assert_eq!(plain.session_id.as_deref(), Some("cs_1"));

        assert!(matches!(
            RawSessionResponse::from_body(b"<html>"),
            Err(ApiError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_api_error_to_checkout_error() {
        assert_eq!(
            CheckoutError::from(ApiError::Application {
                status: 400,
                message: "Card declined".to_string()
            }),
            CheckoutError::SessionCreationFailed("Card declined".to_string())
        );
        assert_eq!(
            CheckoutError::from(ApiError::InvalidResponse("eof".to_string())),
            CheckoutError::SessionMissingRedirect
        );
    }

    #[test]
    fn test_status_wire_format() {
        let completed: SessionStatus = serde_json::from_str(
            r#"{"status":"completed","amount_total_minor":2997,"currency":"usd"}"#,
        )
        .unwrap();
        assert_eq!(
            completed,
            SessionStatus::Completed(PaymentDetails {
                amount_total_minor: 2997,
                currency: "usd".to_string(),
                customer_email: None,
            })
        );

        let failed: SessionStatus =
            serde_json::from_str(r#"{"status":"failed","reason":"expired"}"#).unwrap();
        assert_eq!(
            failed,
            SessionStatus::Failed {
                reason: "expired".to_string()
            }
        );
    }

    #[test]
    fn test_request_wire_shape() {
        let request = CreateSessionRequest {
            items: Vec::new(),
            success_url: "https://a.example/payment-success".to_string(),
            cancel_url: "https://a.example/payment-failed".to_string(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("successUrl").is_some());
        assert!(json.get("cancelUrl").is_some());
    }
}
