//! HTTP transport seam.
//!
//! # Responsibility
//! - Deliver one `ApiRequest` with its bearer credential and return the raw
//!   status and body.
//!
//! # Invariants
//! - Transports never interpret status codes; classification happens in
//!   `ApiResponse::into_result`.
//! - Transports never retry.

use crate::api::request::{ApiRequest, ApiResponse, Method};
use crate::api::{ApiError, ApiResult};
use log::debug;
use reqwest::blocking::Client;
use std::time::Duration;

/// Delivery mechanism for API requests.
pub trait Transport: Send + Sync {
    fn send(&self, request: &ApiRequest, bearer: &str) -> ApiResult<ApiResponse>;
}

/// Blocking HTTP transport rooted at a base URL.
pub struct HttpTransport {
    base_url: String,
    client: Client,
}

impl HttpTransport {
    /// Builds a transport for `base_url` (already normalized, no trailing
    /// slash).
    ///
    /// # Errors
    /// Returns `ApiError::Transport` when the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> ApiResult<Self> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &ApiRequest, bearer: &str) -> ApiResult<ApiResponse> {
        let url = self.url_for(&request.path);
        let builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Patch => self.client.patch(&url),
            Method::Delete => self.client.delete(&url),
        };
        let mut builder = builder.bearer_auth(bearer).query(&request.query);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .map_err(|err| ApiError::Transport(err.without_url().to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|err| ApiError::Transport(err.without_url().to_string()))?;
        debug!(
            "event=http_response module=api method={} path={} status={}",
            request.method.as_str(),
            request.path,
            status
        );
        Ok(ApiResponse { status, body })
    }
}
