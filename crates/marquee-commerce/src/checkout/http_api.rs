//! [`CommerceApi`] over HTTP.

use crate::checkout::{
    ApiError, CommerceApi, CreateSessionRequest, RawSessionResponse, SessionStatus,
};
use crate::ids::CheckoutSessionId;
use async_trait::async_trait;
use marquee_data::{FetchClient, FetchError, Response, Transport};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

/// Paths of the backend functions, relative to the client's base URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiEndpoints {
    /// GET, answers `{"configured": bool}`.
    pub payment_config: String,
    /// POST, takes a [`CreateSessionRequest`].
    pub create_checkout: String,
    /// GET, `?session_id=` is appended.
    pub checkout_status: String,
}

impl Default for ApiEndpoints {
    fn default() -> Self {
        Self {
            payment_config: "/functions/v1/payment-config".to_string(),
            create_checkout: "/functions/v1/create-checkout".to_string(),
            checkout_status: "/functions/v1/checkout-status".to_string(),
        }
    }
}

#[derive(Deserialize)]
struct PaymentConfig {
    #[serde(default)]
    configured: bool,
}

/// Commerce backend reached through a [`FetchClient`].
#[derive(Debug)]
pub struct HttpCommerceApi<T> {
    client: FetchClient<T>,
    endpoints: ApiEndpoints,
    token: Option<String>,
}

impl<T: Transport> HttpCommerceApi<T> {
    pub fn new(client: FetchClient<T>) -> Self {
        Self {
            client,
            endpoints: ApiEndpoints::default(),
            token: None,
        }
    }

    pub fn with_endpoints(mut self, endpoints: ApiEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Send `Authorization: Bearer <token>` on every call.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.token = if token.trim().is_empty() {
            None
        } else {
            Some(token)
        };
        self
    }

    pub fn client(&self) -> &FetchClient<T> {
        &self.client
    }

    pub fn endpoints(&self) -> &ApiEndpoints {
        &self.endpoints
    }

    async fn get(&self, path: String) -> Result<Response, ApiError> {
        let mut request = self.client.get(path).header("Accept", "application/json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await.map_err(map_fetch_error)?;
        response.error_for_status().map_err(map_fetch_error)
    }
}

fn map_fetch_error(e: FetchError) -> ApiError {
    match e {
        FetchError::HttpError { status, message } => ApiError::Application { status, message },
        FetchError::ParseError(message) | FetchError::JsonError(message) => {
            ApiError::InvalidResponse(message)
        }
        FetchError::RequestError(message)
        | FetchError::InvalidUrl(message)
        | FetchError::Unsupported(message) => ApiError::Transport(message),
    }
}

#[async_trait(?Send)]
impl<T: Transport> CommerceApi for HttpCommerceApi<T> {
    async fn is_payment_provider_configured(&self) -> Result<bool, ApiError> {
        let response = self.get(self.endpoints.payment_config.clone()).await?;
        let config: PaymentConfig = response.json().map_err(map_fetch_error)?;
        Ok(config.configured)
    }

    async fn create_checkout_session(
        &self,
        request: &CreateSessionRequest,
    ) -> Result<RawSessionResponse, ApiError> {
        let mut builder = self
            .client
            .post(self.endpoints.create_checkout.clone())
            .header("Accept", "application/json")
            .json(request)
            .map_err(map_fetch_error)?;
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }

        tracing::debug!(items = request.items.len(), "creating checkout session");
        let response = builder
            .send()
            .await
            .and_then(Response::error_for_status)
            .map_err(map_fetch_error)?;
        RawSessionResponse::from_body(&response.body)
    }

    async fn get_session_status(
        &self,
        session_id: &CheckoutSessionId,
    ) -> Result<SessionStatus, ApiError> {
        let path = format!(
            "{}?session_id={}",
            self.endpoints.checkout_status,
            encode_query_value(session_id.as_str())
        );
        let response = self.get(path).await?;
        response.json().map_err(map_fetch_error)
    }
}

/// Everything outside the RFC 3986 unreserved set.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

fn encode_query_value(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE).to_string()
}
