//! HTTP client utilities for the Marquee storefront.
//!
//! Provides a small builder API for JSON requests against the commerce
//! backend. The actual send goes through a [`Transport`], so the same client
//! runs on Spin (`SpinTransport`, `wasm32` only) or against a canned transport
//! in tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use marquee_data::FetchClient;
//!
//! let client = FetchClient::new(SpinTransport)
//!     .with_base_url("https://api.example.com")
//!     .with_default_header("apikey", key);
//!
//! let session: SessionResponse = client
//!     .post("/functions/v1/create-checkout")
//!     .json(&body)?
//!     .send()
//!     .await?
//!     .error_for_status()?
//!     .json()?;
//! ```

mod error;
mod request;
mod response;
mod transport;

pub use error::FetchError;
pub use request::{Method, RequestBuilder};
pub use response::Response;
pub use transport::{Transport, UnavailableTransport};

#[cfg(target_arch = "wasm32")]
pub use transport::SpinTransport;

#[cfg(all(feature = "native", not(target_arch = "wasm32")))]
pub use transport::ReqwestTransport;

use std::collections::BTreeMap;

/// HTTP client for making outbound requests.
#[derive(Debug, Clone)]
pub struct FetchClient<T> {
    transport: T,
    base_url: Option<String>,
    default_headers: BTreeMap<String, String>,
}

impl<T: Transport> FetchClient<T> {
    /// Create a new HTTP client over `transport`.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            base_url: None,
            default_headers: BTreeMap::new(),
        }
    }

    /// Create a client with a base URL that will be prepended to relative request paths.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Add a default header that will be included in all requests.
    pub fn with_default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    /// The configured base URL.
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Create a GET request.
    pub fn get(&self, url: impl Into<String>) -> ClientRequestBuilder<'_, T> {
        self.request(Method::Get, url)
    }

    /// Create a POST request.
    pub fn post(&self, url: impl Into<String>) -> ClientRequestBuilder<'_, T> {
        self.request(Method::Post, url)
    }

    /// Create a request with a custom method.
    pub fn request(&self, method: Method, url: impl Into<String>) -> ClientRequestBuilder<'_, T> {
        let url = url.into();
        let full_url = match &self.base_url {
            Some(base) if !(url.starts_with("http://") || url.starts_with("https://")) => {
                format!(
                    "{}/{}",
                    base.trim_end_matches('/'),
                    url.trim_start_matches('/')
                )
            }
            _ => url,
        };

        let mut builder = RequestBuilder::new(method, full_url);
        for (key, value) in &self.default_headers {
            builder = builder.header(key.clone(), value.clone());
        }

        ClientRequestBuilder {
            client: self,
            builder,
        }
    }
}

/// A request builder bound to a client.
#[derive(Debug)]
pub struct ClientRequestBuilder<'a, T> {
    client: &'a FetchClient<T>,
    builder: RequestBuilder,
}

impl<T: Transport> ClientRequestBuilder<'_, T> {
    /// Add a header to the request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.builder = self.builder.header(key, value);
        self
    }

    /// Set the request body as JSON.
    pub fn json<B: serde::Serialize>(mut self, value: &B) -> Result<Self, FetchError> {
        self.builder = self.builder.json(value)?;
        Ok(self)
    }

    /// Add a bearer token authorization header.
    pub fn bearer_auth(mut self, token: impl AsRef<str>) -> Self {
        self.builder = self.builder.bearer_auth(token);
        self
    }

    /// Send the request and return the response.
    pub async fn send(self) -> Result<Response, FetchError> {
        self.builder.validate()?;
        tracing::debug!(
            method = %self.builder.method,
            url = %self.builder.url,
            "sending request"
        );
        let response = self.client.transport.send(self.builder).await?;
        tracing::debug!(status = response.status, "received response");
        Ok(response)
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{FetchClient, FetchError, Method, Response, Transport};
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::cell::RefCell;

    /// Records requests and answers with a fixed response.
    struct Recorder {
        seen: RefCell<Vec<RequestBuilder>>,
        reply: Response,
    }

    #[async_trait(?Send)]
    impl Transport for Recorder {
        async fn send(&self, request: RequestBuilder) -> Result<Response, FetchError> {
            self.seen.borrow_mut().push(request);
            Ok(self.reply.clone())
        }
    }

    fn recorder() -> Recorder {
        Recorder {
            seen: RefCell::new(Vec::new()),
            reply: Response::json_body(200, br#"{"ok":true}"#.to_vec()),
        }
    }

    #[tokio::test]
    async fn test_base_url_and_default_headers() {
        let client = FetchClient::new(recorder())
            .with_base_url("https://api.example.com/")
            .with_default_header("apikey", "anon");

        client.post("/functions/v1/create-checkout").send().await.unwrap();

        let seen = client.transport().seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(
            seen[0].url(),
            "https://api.example.com/functions/v1/create-checkout"
        );
        assert_eq!(seen[0].method(), Method::Post);
        assert_eq!(seen[0].header_value("apikey"), Some("anon"));
    }

    #[tokio::test]
    async fn test_absolute_url_ignores_base() {
        let client = FetchClient::new(recorder()).with_base_url("https://api.example.com");
        client.get("https://other.example.com/x").send().await.unwrap();
        assert_eq!(
            client.transport().seen.borrow()[0].url(),
            "https://other.example.com/x"
        );
    }

    #[tokio::test]
    async fn test_invalid_url_never_reaches_transport() {
        let client = FetchClient::new(recorder());
        let result = client.get("not a url").send().await;
        assert!(matches!(result, Err(FetchError::InvalidUrl(_))));
        assert!(client.transport().seen.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_unavailable_transport() {
        let client = FetchClient::new(UnavailableTransport);
        let result = client.get("https://api.example.com").send().await;
        assert!(matches!(result, Err(FetchError::Unsupported(_))));
    }
}
