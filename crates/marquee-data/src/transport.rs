//! Outbound transports.

use crate::{FetchError, RequestBuilder, Response};
use async_trait::async_trait;

/// Sends a prepared request.
///
/// Futures are not required to be `Send`: the storefront runs on a single
/// thread, and Spin's outbound HTTP futures are not `Send` either.
#[async_trait(?Send)]
pub trait Transport {
    /// Send `request` and return the raw response, whatever its status.
    async fn send(&self, request: RequestBuilder) -> Result<Response, FetchError>;
}

/// A transport for hosts without outbound HTTP; every send fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableTransport;

#[async_trait(?Send)]
impl Transport for UnavailableTransport {
    async fn send(&self, request: RequestBuilder) -> Result<Response, FetchError> {
        Err(FetchError::Unsupported(format!(
            "{} {}",
            request.method(),
            request.url()
        )))
    }
}

/// Spin outbound HTTP.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SpinTransport;

#[cfg(target_arch = "wasm32")]
#[async_trait(?Send)]
impl Transport for SpinTransport {
    async fn send(&self, request: RequestBuilder) -> Result<Response, FetchError> {
        use spin_sdk::http::{Method as SpinMethod, Request};

        let method = match request.method() {
            crate::Method::Get => SpinMethod::Get,
            crate::Method::Post => SpinMethod::Post,
        };

        let mut builder = Request::builder();
        builder.method(method).uri(request.url());
        for (key, value) in request.headers() {
            builder.header(key, value);
        }
        let outgoing = builder
            .body(request.body_bytes().unwrap_or_default().to_vec())
            .build();

        let response: spin_sdk::http::Response = spin_sdk::http::send(outgoing)
            .await
            .map_err(|e| FetchError::RequestError(e.to_string()))?;

        let status = *response.status();
        let headers = response
            .headers()
            .map(|(k, v)| (k.to_string(), v.as_str().unwrap_or("").to_string()))
            .collect();
        Ok(Response::new(status, headers, response.into_body()))
    }
}

/// Native outbound HTTP backed by `reqwest`.
#[cfg(all(feature = "native", not(target_arch = "wasm32")))]
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

#[cfg(all(feature = "native", not(target_arch = "wasm32")))]
impl ReqwestTransport {
    /// Create a transport with a fresh connection pool.
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(all(feature = "native", not(target_arch = "wasm32")))]
#[async_trait(?Send)]
impl Transport for ReqwestTransport {
    async fn send(&self, request: RequestBuilder) -> Result<Response, FetchError> {
        let method = match request.method() {
            crate::Method::Get => reqwest::Method::GET,
            crate::Method::Post => reqwest::Method::POST,
        };

        let mut outgoing = self.client.request(method, request.url());
        for (key, value) in request.headers() {
            outgoing = outgoing.header(key, value);
        }
        if let Some(body) = request.body_bytes() {
            outgoing = outgoing.body(body.to_vec());
        }

        let response = outgoing
            .send()
            .await
            .map_err(|e| FetchError::RequestError(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::RequestError(e.to_string()))?;

        Ok(Response::new(status, headers, body.to_vec()))
    }
}
