//! Generic creation form.
//!
//! # Responsibility
//! - Collect a new record's editable fields and parent references.
//! - Submit exactly one create request per submission.
//!
//! # Invariants
//! - Nothing is inserted locally before the server returns the stored record.
//! - Success appends the returned record (with its server identity) and clears
//!   the fields; failure keeps the fields for a retry.
//! - A create that completes after the owning collection was unmounted is
//!   `Stale`: the fields stay as typed and nothing is reported as created.
//!
//! # See also
//! - `service::collection::EditableCollection::append`

use crate::api::client::ApiClient;
use crate::api::request::{ApiRequest, ApiResponse};
use crate::api::{ApiError, ApiResult};
use crate::model::resource::{FieldSpec, RecordId, Resource};
use crate::service::collection::EditableCollection;
use crate::service::operation::{Completion, Operation, OperationError};
use log::{debug, info, warn};
use serde_json::{Map, Value};
use std::marker::PhantomData;

/// Form state for creating one `R`.
pub struct CreationForm<R: Resource> {
    client: ApiClient,
    values: Vec<(&'static FieldSpec, String)>,
    parents: Vec<(&'static str, RecordId)>,
    message: Option<String>,
    last_error: Option<OperationError>,
    created: Option<R>,
    _resource: PhantomData<R>,
}

impl<R: Resource> CreationForm<R> {
    /// Empty form with one blank input per editable field.
    pub fn new(client: ApiClient) -> Self {
        let values = R::spec()
            .fields
            .iter()
            .map(|field| (field, String::new()))
            .collect();
        Self {
            client,
            values,
            parents: Vec::new(),
            message: None,
            last_error: None,
            created: None,
            _resource: PhantomData,
        }
    }

    /// Sets a back-reference carried by every submission, e.g. `student`.
    pub fn with_parent(mut self, key: &'static str, id: RecordId) -> Self {
        self.parents.retain(|(existing, _)| *existing != key);
        self.parents.push((key, id));
        self
    }

    /// Updates one input. Returns false for an unknown field.
    pub fn set(&mut self, field: &str, value: impl Into<String>) -> bool {
        match self.values.iter_mut().find(|(spec, _)| spec.matches(field)) {
            Some((_, slot)) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    pub fn value(&self, field: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(spec, _)| spec.matches(field))
            .map(|(_, value)| value.as_str())
    }

    /// Message shown under the form after a failed submission.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn last_error(&self) -> Option<&OperationError> {
        self.last_error.as_ref()
    }

    /// Record returned by the most recent applied submission.
    pub fn created(&self) -> Option<&R> {
        self.created.as_ref()
    }

    /// Validates required inputs and builds the create request.
    ///
    /// # Errors
    /// `ValidationFailure` naming the first empty required field or missing
    /// parent reference.
    pub fn submit_request(&self) -> Result<ApiRequest, OperationError> {
        let spec = R::spec();
        let mut body = Map::new();

        for parent_key in spec.parent_keys {
            match self.parents.iter().find(|(key, _)| key == parent_key) {
                Some((key, id)) => {
                    body.insert((*key).to_string(), Value::from(*id));
                }
                None => {
                    return Err(self.validation_error(*parent_key));
                }
            }
        }

        for (field, text) in &self.values {
            if field.required && text.trim().is_empty() {
                return Err(self.validation_error(field.name));
            }
            body.insert(field.key.to_string(), field.value_from_input(text).to_json());
        }

        Ok(ApiRequest::create::<R>(body))
    }

    /// Submits the form and appends the created record to `collection`.
    ///
    /// On `Applied` the stored record is available through `created`.
    pub fn submit(
        &mut self,
        collection: &mut EditableCollection<R>,
    ) -> Result<Completion, OperationError> {
        self.message = None;
        self.last_error = None;
        self.created = None;

        let request = match self.submit_request() {
            Ok(request) => request,
            Err(err) => return Err(self.fail(err)),
        };
        let result = self.client.execute(&request);
        self.complete_submit(collection, result)
    }

    pub fn complete_submit(
        &mut self,
        collection: &mut EditableCollection<R>,
        result: ApiResult<ApiResponse>,
    ) -> Result<Completion, OperationError> {
        if !collection.is_mounted() {
            debug!(
                "event=stale_completion module=creation_form resource={} operation=create",
                R::spec().path
            );
            return Ok(Completion::Stale);
        }

        let record = match result.and_then(|response| response.json::<R>()) {
            Ok(record) => record,
            Err(source) => {
                let err = OperationError::new(Operation::Create, R::spec().label, source);
                return Err(self.fail(err));
            }
        };

        let id = record.id();
        let completion = collection.append(record.clone());
        if completion != Completion::Applied {
            return Ok(completion);
        }
        self.clear();
        self.created = Some(record);
        info!(
            "event=record_create module=creation_form status=ok resource={} id={}",
            R::spec().path,
            id
        );
        Ok(Completion::Applied)
    }

    /// Empties every input; parent references stay.
    pub fn clear(&mut self) {
        for (_, value) in &mut self.values {
            value.clear();
        }
        self.message = None;
        self.last_error = None;
    }

    fn validation_error(&self, field: &'static str) -> OperationError {
        OperationError::new(
            Operation::Create,
            R::spec().label,
            ApiError::Validation { field },
        )
    }

    fn fail(&mut self, err: OperationError) -> OperationError {
        warn!(
            "event=record_create module=creation_form status=error resource={} error={}",
            R::spec().path,
            err.source
        );
        self.message = Some(err.user_message());
        self.last_error = Some(err.clone());
        err
    }
}
