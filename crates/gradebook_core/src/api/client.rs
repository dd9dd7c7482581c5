//! Authenticated API client shared by collections and forms.

use crate::api::request::{ApiRequest, ApiResponse};
use crate::api::token::TokenProvider;
use crate::api::transport::{HttpTransport, Transport};
use crate::api::ApiResult;
use crate::config::ClientConfig;
use crate::model::resource::{RecordId, Resource};
use log::{info, warn};
use std::sync::Arc;

/// Executes requests with a freshly acquired bearer token each time.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    tokens: Arc<dyn TokenProvider>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, tokens: Arc<dyn TokenProvider>) -> Self {
        Self { transport, tokens }
    }

    /// Builds an HTTP-backed client from resolved configuration.
    pub fn from_config(config: &ClientConfig, tokens: Arc<dyn TokenProvider>) -> ApiResult<Self> {
        let transport = HttpTransport::new(
            config.api_base_url.as_str(),
            config.connect_timeout,
            config.request_timeout,
        )?;
        info!(
            "event=api_client_init module=api status=ok base_url={} token_provider={}",
            config.api_base_url,
            tokens.name()
        );
        Ok(Self::new(Arc::new(transport), tokens))
    }

    /// Sends one request and classifies the response.
    ///
    /// The token is requested immediately before sending; a token failure
    /// short-circuits without touching the transport.
    pub fn execute(&self, request: &ApiRequest) -> ApiResult<ApiResponse> {
        let token = self.tokens.bearer_token().inspect_err(|err| {
            warn!(
                "event=token_acquire module=api status=error provider={} error={}",
                self.tokens.name(),
                err
            );
        })?;

        let result = self
            .transport
            .send(request, token.as_str())
            .and_then(ApiResponse::into_result);
        match &result {
            Ok(response) => info!(
                "event=api_request module=api status=ok method={} path={} http_status={}",
                request.method.as_str(),
                request.path,
                response.status
            ),
            Err(err) => warn!(
                "event=api_request module=api status=error method={} path={} error={}",
                request.method.as_str(),
                request.path,
                err
            ),
        }
        result
    }

    /// Lists a collection, optionally filtered by parent identity.
    pub fn list<R: Resource>(&self, parent: Option<RecordId>) -> ApiResult<Vec<R>> {
        self.execute(&ApiRequest::list::<R>(parent))?.json()
    }

    /// Fetches one record by identity.
    pub fn fetch_one<R: Resource>(&self, id: RecordId) -> ApiResult<R> {
        self.execute(&ApiRequest::retrieve::<R>(id))?.json()
    }
}
