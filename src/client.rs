//! The HTTP transport seam.

use crate::error::TransportError;
use crate::types::{ResolvedRequest, Response};

/// Executes one fully resolved request.
///
/// Calls are synchronous: the runner waits for each response before starting
/// the next resource.
pub trait HttpClient {
    fn send(&self, request: &ResolvedRequest) -> Result<Response, TransportError>;
}

impl<T: HttpClient + ?Sized> HttpClient for &T {
    fn send(&self, request: &ResolvedRequest) -> Result<Response, TransportError> {
        (**self).send(request)
    }
}

#[cfg(feature = "http-client")]
pub use reqwest_client::ReqwestClient;

#[cfg(feature = "http-client")]
mod reqwest_client {
    use std::time::Duration;

    use super::HttpClient;
    use crate::enums::Method;
    use crate::error::TransportError;
    use crate::types::{RequestBody, ResolvedRequest, Response};

    /// Blocking client backed by `reqwest`.
    pub struct ReqwestClient {
        inner: reqwest::blocking::Client,
    }

    impl ReqwestClient {
        pub fn new() -> Result<Self, TransportError> {
            Self::build(None)
        }

        /// Client that gives up on any request taking longer than `timeout`.
        pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
            Self::build(Some(timeout))
        }

        fn build(timeout: Option<Duration>) -> Result<Self, TransportError> {
            let mut builder = reqwest::blocking::Client::builder();
            if let Some(timeout) = timeout {
                builder = builder.timeout(timeout);
            }
            let inner = builder.build().map_err(|e| TransportError {
                message: format!("failed to build HTTP client: {e}"),
            })?;
            Ok(ReqwestClient { inner })
        }
    }

    impl From<Method> for reqwest::Method {
        fn from(method: Method) -> Self {
            match method {
                Method::Get => reqwest::Method::GET,
                Method::Post => reqwest::Method::POST,
                Method::Put => reqwest::Method::PUT,
                Method::Delete => reqwest::Method::DELETE,
                Method::Patch => reqwest::Method::PATCH,
                Method::Head => reqwest::Method::HEAD,
                Method::Options => reqwest::Method::OPTIONS,
                Method::Trace => reqwest::Method::TRACE,
            }
        }
    }

    impl HttpClient for ReqwestClient {
        fn send(&self, request: &ResolvedRequest) -> Result<Response, TransportError> {
            let url = reqwest::Url::parse(&request.url).map_err(|e| TransportError {
                message: format!("Invalid URL `{}`: {e}", request.url),
            })?;

            let mut builder = self.inner.request(request.method.into(), url);
            if !request.query.is_empty() {
                builder = builder.query(&request.query);
            }
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            builder = match &request.body {
                RequestBody::Empty => builder,
                RequestBody::Text(text) => builder.body(text.clone()),
                RequestBody::Json(json) => {
                    let payload = serde_json::to_vec(json).map_err(|e| TransportError {
                        message: format!("failed to encode JSON body: {e}"),
                    })?;
                    builder
                        .header(reqwest::header::CONTENT_TYPE, "application/json")
                        .body(payload)
                }
            };

            let response = builder.send().map_err(|e| TransportError {
                message: format!("Request failed: {e}"),
            })?;

            let status = response.status();
            let headers = response
                .headers()
                .iter()
                .map(|(name, value)| {
                    (
                        name.as_str().to_string(),
                        value.to_str().unwrap_or("<binary>").to_string(),
                    )
                })
                .collect();
            let bytes = response.bytes().map_err(|e| TransportError {
                message: format!("Failed to read response: {e}"),
            })?;
            let text = String::from_utf8_lossy(&bytes).into_owned();
            let json = serde_json::from_str(&text).ok();

            Ok(Response {
                status: status.as_u16(),
                reason: status.canonical_reason().map(str::to_string),
                headers,
                text: if text.is_empty() { None } else { Some(text) },
                json,
            })
        }
    }
}
