//! Bearer credential providers.
//!
//! # Responsibility
//! - Hide identity-provider details behind one opaque call.
//!
//! # Invariants
//! - `bearer_token` is called immediately before every request; providers
//!   must not assume their result is reused.
//! - Token values never appear in logs or error messages.

use crate::api::{ApiError, ApiResult};

/// Source of bearer credentials for API requests.
pub trait TokenProvider: Send + Sync {
    /// Acquires a token for the next request.
    ///
    /// # Errors
    /// Returns `ApiError::Token` when no credential is available.
    fn bearer_token(&self) -> ApiResult<String>;

    /// Provider name for logging.
    fn name(&self) -> &'static str;
}

/// Provider returning one fixed token. Used by tests and short-lived tools.
#[derive(Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl std::fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenProvider")
            .field("token", &"<redacted>")
            .finish()
    }
}

impl TokenProvider for StaticTokenProvider {
    fn bearer_token(&self) -> ApiResult<String> {
        if self.token.trim().is_empty() {
            return Err(ApiError::Token("static token is empty".to_string()));
        }
        Ok(self.token.clone())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

/// Provider that re-reads an environment variable before every request, so an
/// external helper can rotate the session token underneath a running client.
#[derive(Debug, Clone)]
pub struct EnvTokenProvider {
    var: String,
}

impl EnvTokenProvider {
    pub const DEFAULT_VAR: &'static str = "GRADEBOOK_TOKEN";

    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvTokenProvider {
    fn default() -> Self {
        Self::new(Self::DEFAULT_VAR)
    }
}

impl TokenProvider for EnvTokenProvider {
    fn bearer_token(&self) -> ApiResult<String> {
        match std::env::var(&self.var) {
            Ok(raw) if !raw.trim().is_empty() => Ok(raw.trim().to_string()),
            _ => Err(ApiError::Token(format!("`{}` is not set", self.var))),
        }
    }

    fn name(&self) -> &'static str {
        "env"
    }
}
