//! Generic editable collection controller.
//!
//! # Responsibility
//! - Load one entity type's collection, optionally scoped to a parent.
//! - Apply single-field saves and confirmed deletes after the server agrees.
//!
//! # Invariants
//! - Records keep server order; created records are appended; nothing is
//!   re-sorted after edits.
//! - A failed save or delete leaves every local record untouched.
//! - A failed load hides the table body until the next successful load.
//! - Saves and deletes only target rendered rows; a completion whose row is
//!   gone reports `Detached` and touches nothing.
//! - Completions arriving after `unmount` change nothing.
//!
//! Every operation comes in two halves: a `*_request` builder and a
//! `complete_*` handler. The one-call forms (`load`, `save_field`,
//! `delete_record`) run both halves around a blocking request.

use crate::api::client::ApiClient;
use crate::api::request::{ApiRequest, ApiResponse};
use crate::api::{ApiError, ApiResult};
use crate::editor::field_editor::FieldEditor;
use crate::model::resource::{
    display_field, merge_field, FieldSpec, FieldValue, RecordId, Resource,
};
use crate::service::operation::{Completion, ConfirmPrompt, Liveness, Operation, OperationError};
use log::{debug, info, warn};

/// Whether the table body can be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    NotLoaded,
    Ready,
    Failed(OperationError),
}

/// A single-field save that has been built but not yet completed.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSave {
    pub id: RecordId,
    pub field: &'static FieldSpec,
    pub value: FieldValue,
    pub request: ApiRequest,
}

/// In-memory, server-mirrored list of one entity type.
pub struct EditableCollection<R: Resource> {
    client: ApiClient,
    parent: Option<RecordId>,
    records: Vec<R>,
    load_state: LoadState,
    last_error: Option<OperationError>,
    liveness: Liveness,
}

impl<R: Resource> EditableCollection<R> {
    /// Unscoped collection (every record the server returns).
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            parent: None,
            records: Vec::new(),
            load_state: LoadState::NotLoaded,
            last_error: None,
            liveness: Liveness::new(),
        }
    }

    /// Collection scoped to one parent, e.g. the subjects of one student.
    pub fn for_parent(client: ApiClient, parent: RecordId) -> Self {
        let mut collection = Self::new(client);
        collection.parent = Some(parent);
        collection
    }

    pub fn parent(&self) -> Option<RecordId> {
        self.parent
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn load_error(&self) -> Option<&OperationError> {
        match &self.load_state {
            LoadState::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Rows to render. Empty unless the last load succeeded.
    pub fn rows(&self) -> &[R] {
        match self.load_state {
            LoadState::Ready => self.records.as_slice(),
            _ => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.rows().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows().is_empty()
    }

    pub fn get(&self, id: RecordId) -> Option<&R> {
        self.rows().iter().find(|record| record.id() == id)
    }

    /// Display text of one field of one record.
    pub fn display_value(&self, id: RecordId, field: &str) -> Option<String> {
        let spec = R::spec().field(field)?;
        display_field(self.get(id)?, spec.key)
    }

    /// Builds an idle editor for one field of one record.
    pub fn editor(&self, id: RecordId, field: &str) -> Option<FieldEditor> {
        FieldEditor::for_record(self.get(id)?, field)
    }

    /// Most recent save/delete failure, for an inline or page-level message.
    pub fn last_error(&self) -> Option<&OperationError> {
        self.last_error.as_ref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Handle that in-flight work can check before completing.
    pub fn liveness(&self) -> Liveness {
        self.liveness.clone()
    }

    pub fn is_mounted(&self) -> bool {
        self.liveness.is_alive()
    }

    /// Tears the controller down; later completions become no-ops.
    pub fn unmount(&mut self) {
        self.liveness.kill();
        debug!(
            "event=collection_unmount module=collection resource={}",
            R::spec().path
        );
    }

    // ----- load -----

    pub fn load_request(&self) -> ApiRequest {
        ApiRequest::list::<R>(self.parent)
    }

    /// Fetches the collection and replaces local records on success.
    pub fn load(&mut self) -> Result<Completion, OperationError> {
        let request = self.load_request();
        let result = self.client.execute(&request);
        self.complete_load(result)
    }

    pub fn complete_load(
        &mut self,
        result: ApiResult<ApiResponse>,
    ) -> Result<Completion, OperationError> {
        if !self.check_alive(Operation::Load) {
            return Ok(Completion::Stale);
        }

        match result.and_then(|response| response.json::<Vec<R>>()) {
            Ok(mut records) => {
                if let Some(parent) = self.parent {
                    let before = records.len();
                    records.retain(|record| record.parent_id() == Some(parent));
                    if records.len() != before {
                        warn!(
                            "event=collection_load module=collection status=filtered resource={} parent={} dropped={}",
                            R::spec().path,
                            parent,
                            before - records.len()
                        );
                    }
                }
                info!(
                    "event=collection_load module=collection status=ok resource={} count={}",
                    R::spec().path,
                    records.len()
                );
                self.records = records;
                self.load_state = LoadState::Ready;
                Ok(Completion::Applied)
            }
            Err(source) => {
                let err = self.operation_error(Operation::Load, source);
                self.load_state = LoadState::Failed(err.clone());
                Err(err)
            }
        }
    }

    // ----- save -----

    /// Builds a partial update for one field.
    ///
    /// # Errors
    /// `ValidationFailure` when `field` is not an editable field of `R` or
    /// `id` is not a rendered row.
    pub fn save_request(
        &self,
        id: RecordId,
        field: &str,
        value: FieldValue,
    ) -> Result<PendingSave, OperationError> {
        let spec = R::spec().field(field).ok_or_else(|| {
            self.operation_error(Operation::Save, ApiError::UnknownField(field.to_string()))
        })?;
        if self.get(id).is_none() {
            return Err(self.operation_error(Operation::Save, ApiError::NotLoaded { id }));
        }
        Ok(PendingSave {
            id,
            field: spec,
            request: ApiRequest::patch_field::<R>(id, spec.key, &value),
            value,
        })
    }

    /// Saves raw input text into one field. Empty input on a nullable field
    /// is sent as `null`.
    pub fn save_field(
        &mut self,
        id: RecordId,
        field: &str,
        value: &str,
    ) -> Result<Completion, OperationError> {
        let spec = R::spec().field(field).ok_or_else(|| {
            self.operation_error(Operation::Save, ApiError::UnknownField(field.to_string()))
        })?;
        self.save_value(id, spec.key, spec.value_from_input(value))
    }

    /// Saves an already-converted value into one field.
    pub fn save_value(
        &mut self,
        id: RecordId,
        field: &str,
        value: FieldValue,
    ) -> Result<Completion, OperationError> {
        let pending = self.save_request(id, field, value)?;
        let result = self.client.execute(&pending.request);
        self.complete_save(pending, result)
    }

    pub fn complete_save(
        &mut self,
        pending: PendingSave,
        result: ApiResult<ApiResponse>,
    ) -> Result<Completion, OperationError> {
        if !self.check_alive(Operation::Save) {
            return Ok(Completion::Stale);
        }
        self.last_error = None;

        let response = match result {
            Ok(response) => response,
            Err(source) => return Err(self.record_failure(Operation::Save, source)),
        };

        let Some(index) = self.rendered_index(pending.id) else {
            warn!(
                "event=record_save module=collection status=detached resource={} id={}",
                R::spec().path,
                pending.id
            );
            return Ok(Completion::Detached);
        };

        // Why: PATCH responses may be partial or empty; the committed value is
        // authoritative, so the full server body is only a fallback when the
        // local merge cannot be decoded.
        let merged = merge_field(&self.records[index], pending.field.key, pending.value.to_json())
            .or_else(|_| response.json::<R>());
        match merged {
            Ok(record) => {
                self.records[index] = record;
                info!(
                    "event=record_save module=collection status=ok resource={} id={} field={}",
                    R::spec().path,
                    pending.id,
                    pending.field.key
                );
                Ok(Completion::Applied)
            }
            Err(source) => Err(self.record_failure(Operation::Save, source)),
        }
    }

    /// Commits `editor` through this collection and refreshes its value.
    ///
    /// Returns `None` when the editor was not editing. The editor is back in
    /// `Idle` afterwards whatever the outcome.
    pub fn save_from_editor(
        &mut self,
        id: RecordId,
        editor: &mut FieldEditor,
    ) -> Option<Result<Completion, OperationError>> {
        let key = editor.field().key;
        let outcome = editor.commit_with(|value| self.save_value(id, key, value))?;
        if let Some(current) = self.display_value(id, key) {
            editor.sync_value(current);
        }
        Some(outcome)
    }

    // ----- delete -----

    pub fn delete_prompt(&self) -> String {
        format!(
            "Are you sure you want to permanently delete this {}?",
            R::spec().label
        )
    }

    pub fn delete_request(&self, id: RecordId) -> ApiRequest {
        ApiRequest::delete::<R>(id)
    }

    /// Deletes one record after the user confirms.
    ///
    /// Declining sends nothing and changes nothing. A row that is not
    /// rendered fails with `ValidationFailure` before the prompt.
    pub fn delete_record(
        &mut self,
        id: RecordId,
        prompt: &mut impl ConfirmPrompt,
    ) -> Result<Completion, OperationError> {
        if self.get(id).is_none() {
            return Err(self.operation_error(Operation::Delete, ApiError::NotLoaded { id }));
        }
        if !prompt.confirm(&self.delete_prompt()) {
            debug!(
                "event=record_delete module=collection status=declined resource={} id={}",
                R::spec().path,
                id
            );
            return Ok(Completion::Declined);
        }
        let request = self.delete_request(id);
        let result = self.client.execute(&request);
        self.complete_delete(id, result)
    }

    pub fn complete_delete(
        &mut self,
        id: RecordId,
        result: ApiResult<ApiResponse>,
    ) -> Result<Completion, OperationError> {
        if !self.check_alive(Operation::Delete) {
            return Ok(Completion::Stale);
        }
        self.last_error = None;

        if let Err(source) = result {
            return Err(self.record_failure(Operation::Delete, source));
        }
        let Some(index) = self.rendered_index(id) else {
            warn!(
                "event=record_delete module=collection status=detached resource={} id={}",
                R::spec().path,
                id
            );
            return Ok(Completion::Detached);
        };
        self.records.remove(index);
        info!(
            "event=record_delete module=collection status=ok resource={} id={}",
            R::spec().path,
            id
        );
        Ok(Completion::Applied)
    }

    // ----- create -----

    /// Appends a server-confirmed new record at the end.
    pub fn append(&mut self, record: R) -> Completion {
        if !self.check_alive(Operation::Create) {
            return Completion::Stale;
        }
        self.records.push(record);
        Completion::Applied
    }

    /// Position of `id` among rendered rows. `None` while the table is hidden.
    fn rendered_index(&self, id: RecordId) -> Option<usize> {
        if self.load_state != LoadState::Ready {
            return None;
        }
        self.records.iter().position(|record| record.id() == id)
    }

    fn check_alive(&self, operation: Operation) -> bool {
        let alive = self.liveness.is_alive();
        if !alive {
            debug!(
                "event=stale_completion module=collection resource={} operation={}",
                R::spec().path,
                operation.as_str()
            );
        }
        alive
    }

    fn operation_error(&self, operation: Operation, source: ApiError) -> OperationError {
        OperationError::new(operation, R::spec().label, source)
    }

    fn record_failure(&mut self, operation: Operation, source: ApiError) -> OperationError {
        let err = self.operation_error(operation, source);
        warn!(
            "event=record_{} module=collection status=error resource={} error={}",
            operation.as_str(),
            R::spec().path,
            err.source
        );
        self.last_error = Some(err.clone());
        err
    }
}
