//! Pluggable transports that actually move bytes.

use async_trait::async_trait;

use crate::{FetchError, Request, Response};

/// Something that can execute a [`Request`].
///
/// Non-success statuses are returned as `Ok(Response)`; only failures that
/// produce no response at all are errors here. Futures are not required to be
/// `Send`: the page runs on a single cooperative event loop.
#[async_trait(?Send)]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: Request) -> Result<Response, FetchError>;
}

/// Outbound HTTP through the Spin host.
///
/// Requests with [`Credentials::SameOrigin`](crate::Credentials::SameOrigin)
/// forward the shopper's session cookie, when one was supplied.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone)]
pub struct SpinTransport {
    session_cookie: Option<String>,
}

#[cfg(target_arch = "wasm32")]
impl SpinTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cookie header value to forward on same-origin requests.
    pub fn with_session_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.session_cookie = Some(cookie.into());
        self
    }
}

#[cfg(target_arch = "wasm32")]
#[async_trait(?Send)]
impl HttpTransport for SpinTransport {
    async fn send(&self, request: Request) -> Result<Response, FetchError> {
        use crate::{Credentials, Method};
        use spin_sdk::http::Method as SpinMethod;

        let method = match request.method {
            Method::Get => SpinMethod::Get,
            Method::Post => SpinMethod::Post,
            Method::Put => SpinMethod::Put,
            Method::Delete => SpinMethod::Delete,
        };

        let mut builder = spin_sdk::http::Request::builder();
        builder.method(method).uri(request.url.as_str());
        for (key, value) in &request.headers {
            builder.header(key.as_str(), value.as_str());
        }
        if request.credentials == Credentials::SameOrigin {
            if let Some(cookie) = &self.session_cookie {
                builder.header("Cookie", cookie.as_str());
            }
        }
        if let Some(body) = request.body {
            builder.body(body);
        }

        let response: spin_sdk::http::Response = spin_sdk::http::send(builder.build())
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
