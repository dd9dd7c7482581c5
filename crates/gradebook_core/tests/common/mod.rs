#![allow(dead_code)]

use gradebook_core::{
    ApiClient, ApiError, ApiRequest, ApiResponse, ApiResult, TokenProvider, Transport,
};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Transport answering from a queue of canned responses and recording every
/// request it receives together with the bearer token.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<ApiResult<ApiResponse>>>,
    sent: Mutex<Vec<(ApiRequest, String)>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, status: u16, body: Value) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(ApiResponse::new(status, body.to_string())));
    }

    pub fn respond_empty(&self, status: u16) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(ApiResponse::new(status, "")));
    }

    /// Queues a failure that never produced an HTTP response.
    pub fn fail_with(&self, err: ApiError) {
        self.responses.lock().unwrap().push_back(Err(err));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(request, _)| request.clone())
            .collect()
    }

    pub fn tokens(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(_, token)| token.clone())
            .collect()
    }

    pub fn request_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: &ApiRequest, bearer: &str) -> ApiResult<ApiResponse> {
        self.sent
            .lock()
            .unwrap()
            .push((request.clone(), bearer.to_string()));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("scripted transport ran out of responses")
    }
}

/// Issues `token-1`, `token-2`, ... so tests can see a fresh token per request.
#[derive(Default)]
pub struct CountingTokens {
    issued: AtomicUsize,
}

impl TokenProvider for CountingTokens {
    fn bearer_token(&self) -> ApiResult<String> {
        let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("token-{n}"))
    }

    fn name(&self) -> &'static str {
        "counting"
    }
}

/// Issues `allowed` tokens, then fails every later acquisition.
pub struct LimitedTokens {
    allowed: usize,
    issued: AtomicUsize,
}

impl LimitedTokens {
    pub fn new(allowed: usize) -> Self {
        Self {
            allowed,
            issued: AtomicUsize::new(0),
        }
    }
}

impl TokenProvider for LimitedTokens {
    fn bearer_token(&self) -> ApiResult<String> {
        let n = self.issued.fetch_add(1, Ordering::SeqCst);
        if n < self.allowed {
            Ok(format!("token-{}", n + 1))
        } else {
            Err(ApiError::Token("session expired".to_string()))
        }
    }

    fn name(&self) -> &'static str {
        "limited"
    }
}

pub fn client_with_tokens(
    transport: &Arc<ScriptedTransport>,
    tokens: impl TokenProvider + 'static,
) -> ApiClient {
    ApiClient::new(transport.clone(), Arc::new(tokens))
}

pub fn client_for(transport: &Arc<ScriptedTransport>) -> ApiClient {
    ApiClient::new(transport.clone(), Arc::new(CountingTokens::default()))
}
