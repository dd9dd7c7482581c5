//! Remote records API: requests, transport, credentials and error taxonomy.
//!
//! # Responsibility
//! - Build entity-scoped REST requests from resource descriptors.
//! - Attach a freshly acquired bearer credential to every request.
//! - Classify responses into the client error taxonomy.
//!
//! # Invariants
//! - 2xx is success; 403 is permission-denied; 404 is not-found; every other
//!   status and every transport failure is a transient/unknown failure.
//! - No request is ever retried.
//! - Tokens are never cached and never logged.
//!
//! # See also
//! - `service::operation::OperationError::user_message` for the text shown
//!   per kind.

use crate::model::resource::RecordId;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod client;
pub mod request;
pub mod token;
pub mod transport;

pub type ApiResult<T> = Result<T, ApiError>;

/// Coarse failure categories surfaced to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    PermissionDenied,
    NotFound,
    TransientOrUnknownFailure,
    /// Client-side required-field check failed.
    ValidationFailure,
}

/// Failure of a single API interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Server answered 403.
    PermissionDenied { status: u16 },
    /// Server answered 404.
    NotFound { status: u16 },
    /// Any other non-2xx status.
    Status { status: u16, body: String },
    /// Request never produced a response.
    Transport(String),
    /// Credential acquisition failed.
    Token(String),
    /// Response body did not match the expected record shape.
    Decode(String),
    /// A required field was empty at submission time.
    Validation { field: &'static str },
    /// Caller named a field the resource does not have.
    UnknownField(String),
    /// Target record is not among the loaded rows; nothing was sent.
    NotLoaded { id: RecordId },
}

impl ApiError {
    /// Classifies a non-success status. Returns `None` for 2xx.
    pub fn from_status(status: u16, body: impl Into<String>) -> Option<Self> {
        match status {
            200..=299 => None,
            403 => Some(Self::PermissionDenied { status }),
            404 => Some(Self::NotFound { status }),
            _ => Some(Self::Status {
                status,
                body: body.into(),
            }),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Validation { .. } | Self::UnknownField(_) | Self::NotLoaded { .. } => {
                ErrorKind::ValidationFailure
            }
            Self::Status { .. } | Self::Transport(_) | Self::Token(_) | Self::Decode(_) => {
                ErrorKind::TransientOrUnknownFailure
            }
        }
    }

    /// HTTP status, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::PermissionDenied { status }
            | Self::NotFound { status }
            | Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PermissionDenied { status } => write!(f, "permission denied (HTTP {status})"),
            Self::NotFound { status } => write!(f, "record not found (HTTP {status})"),
            Self::Status { status, .. } => write!(f, "unexpected HTTP status {status}"),
            Self::Transport(message) => write!(f, "transport failure: {message}"),
            Self::Token(message) => write!(f, "credential acquisition failed: {message}"),
            Self::Decode(message) => write!(f, "unexpected response body: {message}"),
            Self::Validation { field } => write!(f, "required field `{field}` is empty"),
            Self::UnknownField(field) => write!(f, "unknown field `{field}`"),
            Self::NotLoaded { id } => write!(f, "record {id} is not loaded"),
        }
    }
}

impl Error for ApiError {}

impl From<serde_json::Error> for ApiError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value.to_string())
    }
}
