//! Operation outcomes, user-facing errors and completion liveness.

use crate::api::{ApiError, ErrorKind};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// User action an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Load,
    Save,
    Delete,
    Create,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Save => "save",
            Self::Delete => "delete",
            Self::Create => "create",
        }
    }
}

/// How a completion was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Local state now mirrors the server response.
    Applied,
    /// Owner was torn down before the response arrived; nothing changed.
    Stale,
    /// User declined the confirmation prompt; no request was sent.
    Declined,
    /// Server accepted the change but the record is not among the rendered
    /// rows, so local state was left alone.
    Detached,
}

/// Failure of one user action on one entity type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationError {
    pub operation: Operation,
    /// Singular entity label, e.g. `assignment`.
    pub entity: &'static str,
    pub source: ApiError,
}

impl OperationError {
    pub fn new(operation: Operation, entity: &'static str, source: ApiError) -> Self {
        Self {
            operation,
            entity,
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.source.kind()
    }

    /// Message suitable for showing in place of, or above, the table.
    pub fn user_message(&self) -> String {
        let entity = self.entity;
        if let ApiError::Validation { field } = &self.source {
            return format!("{field} is required.");
        }
        if let ApiError::UnknownField(field) = &self.source {
            return format!("A {entity} has no field named `{field}`.");
        }
        if let ApiError::NotLoaded { .. } = &self.source {
            return format!("That {entity} isn't loaded. Try refreshing the page.");
        }
        match (self.operation, self.kind()) {
            (Operation::Create, _) => {
                format!("Failed to add {entity}. Please refresh and try again.")
            }
            (Operation::Load, ErrorKind::PermissionDenied) => {
                "You don't have permission to access that.".to_string()
            }
            (Operation::Load, ErrorKind::NotFound) => "That probably doesn't exist.".to_string(),
            (Operation::Save, ErrorKind::PermissionDenied) => {
                format!("You can't edit that {entity}. Try refreshing the page.")
            }
            (Operation::Delete, ErrorKind::PermissionDenied) => {
                format!("You can't delete that {entity}. Try refreshing the page.")
            }
            (_, ErrorKind::NotFound) => {
                format!("That {entity} doesn't exist anymore. Try refreshing the page.")
            }
            _ => "Something went wrong. Please try again.".to_string(),
        }
    }
}

impl Display for OperationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} failed: {}",
            self.operation.as_str(),
            self.entity,
            self.source
        )
    }
}

impl Error for OperationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

/// Shared flag telling in-flight completions whether their owner still exists.
///
/// Clones share one flag; `kill` is permanent.
#[derive(Debug, Clone)]
pub struct Liveness(Arc<AtomicBool>);

impl Liveness {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_alive(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn kill(&self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

/// Blocking yes/no confirmation asked before destructive actions.
pub trait ConfirmPrompt {
    fn confirm(&mut self, message: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> ConfirmPrompt for F {
    fn confirm(&mut self, message: &str) -> bool {
        self(message)
    }
}

#[cfg(test)]
mod tests {
    use super::{Liveness, Operation, OperationError};
    use crate::api::{ApiError, ErrorKind};

    #[test]
    fn permission_denied_messages_name_the_action() {
        let save = OperationError::new(
            Operation::Save,
            "student",
            ApiError::PermissionDenied { status: 403 },
        );
        assert_eq!(save.kind(), ErrorKind::PermissionDenied);
        assert!(save.user_message().contains("can't edit that student"));

        let delete = OperationError::new(
            Operation::Delete,
            "subject",
            ApiError::PermissionDenied { status: 403 },
        );
        assert!(delete.user_message().contains("can't delete that subject"));
    }

    #[test]
    fn create_failures_use_fixed_retry_message() {
        let err = OperationError::new(
            Operation::Create,
            "subject",
            ApiError::Status {
                status: 500,
                body: String::new(),
            },
        );
        assert_eq!(
            err.user_message(),
            "Failed to add subject. Please refresh and try again."
        );
    }

    #[test]
    fn validation_message_names_the_field() {
        let err = OperationError::new(
            Operation::Create,
            "student",
            ApiError::Validation {
                field: "First Name",
            },
        );
        assert_eq!(err.kind(), ErrorKind::ValidationFailure);
        assert_eq!(err.user_message(), "First Name is required.");
    }

    #[test]
    fn unloaded_record_message_asks_for_refresh() {
        let err = OperationError::new(Operation::Save, "subject", ApiError::NotLoaded { id: 4 });
        assert_eq!(err.kind(), ErrorKind::ValidationFailure);
        assert_eq!(
            err.user_message(),
            "That subject isn't loaded. Try refreshing the page."
        );
    }

    #[test]
    fn liveness_is_shared_between_clones() {
        let owner = Liveness::new();
        let in_flight = owner.clone();
        assert!(in_flight.is_alive());
        owner.kill();
        assert!(!in_flight.is_alive());
    }
}
