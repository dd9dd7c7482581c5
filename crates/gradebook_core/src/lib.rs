//! Core client logic for the gradebook records service.
//! Everything a front end needs to list, edit, create and delete students,
//! subjects and assignments against the remote API.

pub mod api;
pub mod config;
pub mod editor;
pub mod logging;
pub mod model;
pub mod service;

pub use api::client::ApiClient;
pub use api::request::{ApiRequest, ApiResponse, Method};
pub use api::token::{EnvTokenProvider, StaticTokenProvider, TokenProvider};
pub use api::transport::{HttpTransport, Transport};
pub use api::{ApiError, ApiResult, ErrorKind};
pub use config::{ClientConfig, ConfigError};
pub use editor::field_editor::{EditorKey, EditorState, FieldEditor, KeyOutcome};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::assignment::Assignment;
pub use model::resource::{FieldKind, FieldSpec, FieldValue, RecordId, Resource, ResourceSpec};
pub use model::student::Student;
pub use model::subject::Subject;
pub use service::collection::{EditableCollection, LoadState, PendingSave};
pub use service::creation_form::CreationForm;
pub use service::operation::{Completion, ConfirmPrompt, Liveness, Operation, OperationError};

/// Minimal health-check API used to confirm the library is linked.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
