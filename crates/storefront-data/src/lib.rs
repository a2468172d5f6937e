//! HTTP client utilities for the storefront API.
//!
//! Provides a small builder API for making HTTP requests with automatic JSON
//! handling. The bytes are moved by a pluggable [`HttpTransport`], so the same
//! client runs on the Spin host (`SpinTransport`) and against in-memory
//! transports in tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use storefront_data::FetchClient;
//!
//! let client = FetchClient::new(transport);
//!
//! let carts: Vec<serde_json::Value> = client
//!     .get("/api/storefront/cart")
//!     .send()
//!     .await?
//!     .error_for_status()?
//!     .json()?;
//! ```

mod error;
mod request;
mod response;
mod transport;

use std::collections::HashMap;
use std::sync::Arc;

pub use error::FetchError;
pub use request::{Credentials, Method, Request, RequestBuilder};
pub use response::Response;
pub use transport::HttpTransport;
#[cfg(target_arch = "wasm32")]
pub use transport::SpinTransport;

/// HTTP client for making outbound requests.
#[derive(Clone)]
pub struct FetchClient {
    transport: Arc<dyn HttpTransport>,
    base_url: Option<String>,
    default_headers: HashMap<String, String>,
    credentials: Credentials,
}

impl std::fmt::Debug for FetchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchClient")
            .field("base_url", &self.base_url)
            .field("default_headers", &self.default_headers)
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

impl FetchClient {
    /// Create a new HTTP client over the given transport.
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            base_url: None,
            default_headers: HashMap::new(),
            credentials: Credentials::default(),
        }
    }

    /// Create a client with a base URL that will be prepended to relative paths.
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

    /// Credentials mode applied to every request from this client.
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Create a GET request.
    pub fn get(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Get, url)
    }

    /// Create a POST request.
    pub fn post(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Post, url)
    }

    /// Create a DELETE request.
    pub fn delete(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Delete, url)
    }

    /// Create a request with a custom method.
    pub fn request(&self, method: Method, url: impl Into<String>) -> ClientRequestBuilder {
        let url = url.into();
        let full_url = match &self.base_url {
            Some(base) if !url.starts_with("http://") && !url.starts_with("https://") => {
                format!("{}{}", base.trim_end_matches('/'), url)
            }
            _ => url,
        };

        let mut builder = RequestBuilder::new(method, full_url).credentials(self.credentials);
        for (key, value) in &self.default_headers {
            builder = builder.header(key.clone(), value.clone());
        }

        ClientRequestBuilder {
            transport: Arc::clone(&self.transport),
            builder,
        }
    }
}

/// A request builder bound to a client.
pub struct ClientRequestBuilder {
    transport: Arc<dyn HttpTransport>,
    builder: RequestBuilder,
}

impl ClientRequestBuilder {
    /// Add a header to the request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.builder = self.builder.header(key, value);
        self
    }

    /// Set the request body as JSON.
    pub fn json<T: serde::Serialize>(mut self, value: &T) -> Result<Self, FetchError> {
        self.builder = self.builder.json(value)?;
        Ok(self)
    }

    /// Set the Accept header.
    pub fn accept(mut self, content_type: impl Into<String>) -> Self {
        self.builder = self.builder.accept(content_type);
        self
    }

    /// Send the request and return the response.
    pub async fn send(self) -> Result<Response, FetchError> {
        let request = self.builder.build();
        tracing::debug!(method = %request.method, url = %request.url, "sending request");
        self.transport.send(request).await
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Credentials, FetchClient, FetchError, HttpTransport, Method, Request, Response};
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct EchoTransport {
        seen: Mutex<Vec<Request>>,
    }

    #[async_trait(?Send)]
    impl HttpTransport for EchoTransport {
        async fn send(&self, request: Request) -> Result<Response, FetchError> {
            self.seen.lock().unwrap().push(request);
            Ok(Response::json_body(200, &serde_json::json!([])))
        }
    }

    #[tokio::test]
    async fn test_base_url_is_prepended_to_relative_paths() {
        let transport = Arc::new(EchoTransport::default());
        let client =
            FetchClient::new(transport.clone()).with_base_url("https://shop.example.com/");

        client.get("/api/storefront/cart").send().await.unwrap();
        client.get("https://other.example.com/x").send().await.unwrap();

        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen[0].url, "https://shop.example.com/api/storefront/cart");
        assert_eq!(seen[1].url, "https://other.example.com/x");
    }

    #[tokio::test]
    async fn test_client_credentials_and_headers_flow_into_request() {
        let transport = Arc::new(EchoTransport::default());
        let client = FetchClient::new(transport.clone())
            .with_default_header("X-Store", "42")
            .with_credentials(Credentials::SameOrigin);

        client
            .delete("/api/storefront/carts/cart-1")
            .accept("application/json")
            .send()
            .await
            .unwrap();

        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen[0].method, Method::Delete);
        assert_eq!(seen[0].credentials, Credentials::SameOrigin);
        assert_eq!(seen[0].header("x-store"), Some("42"));
        assert_eq!(seen[0].header("Accept"), Some("application/json"));
    }
}
