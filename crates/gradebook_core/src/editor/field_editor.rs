//! Single-field inline editor state machine.
//!
//! ```text
//! Idle --activate--> Editing --confirm--> Saving --save returns--> Idle
//!                      |
//!                      +--cancel / blur--> Idle (buffer discarded)
//! ```

use crate::model::resource::{display_field, FieldSpec, FieldValue, Resource};

/// Editor lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorState {
    /// Showing the last committed value.
    Idle,
    /// Holding an uncommitted local copy.
    Editing { buffer: String },
    /// A commit is in flight.
    Saving { pending: FieldValue },
}

/// Keys the editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKey {
    Confirm,
    Cancel,
    Other,
}

impl EditorKey {
    /// Maps DOM/terminal style key names (`Enter`, `Escape`).
    pub fn from_key_name(name: &str) -> Self {
        match name {
            "Enter" | "Return" => Self::Confirm,
            "Escape" | "Esc" => Self::Cancel,
            _ => Self::Other,
        }
    }
}

/// Result of feeding a key into the editor.
#[derive(Debug, PartialEq, Eq)]
pub enum KeyOutcome<T> {
    /// Key had no effect in the current state.
    Ignored,
    /// Edit discarded, previous value restored.
    Cancelled,
    /// Commit ran; carries whatever the save operation returned.
    Committed(T),
}

/// Inline editor bound to one field.
#[derive(Debug, Clone)]
pub struct FieldEditor {
    field: &'static FieldSpec,
    value: String,
    state: EditorState,
}

impl FieldEditor {
    pub fn new(field: &'static FieldSpec, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            state: EditorState::Idle,
        }
    }

    /// Builds an editor for `name` showing the current value from `record`.
    pub fn for_record<R: Resource>(record: &R, name: &str) -> Option<Self> {
        let field = R::spec().field(name)?;
        let value = display_field(record, field.key)?;
        Some(Self::new(field, value))
    }

    pub fn field(&self) -> &'static FieldSpec {
        self.field
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, EditorState::Editing { .. })
    }

    pub fn is_saving(&self) -> bool {
        matches!(self.state, EditorState::Saving { .. })
    }

    /// Last committed value, regardless of state.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// What the surface shows: the buffer while editing, else the value.
    pub fn display_text(&self) -> &str {
        match &self.state {
            EditorState::Editing { buffer } => buffer,
            _ => &self.value,
        }
    }

    /// Enters editing with the buffer seeded from the current value.
    ///
    /// Returns false when already editing or saving.
    pub fn activate(&mut self) -> bool {
        if self.state != EditorState::Idle {
            return false;
        }
        self.state = EditorState::Editing {
            buffer: self.value.clone(),
        };
        true
    }

    /// Replaces the edit buffer. Ignored outside `Editing`.
    pub fn input(&mut self, text: impl Into<String>) -> bool {
        match &mut self.state {
            EditorState::Editing { buffer } => {
                *buffer = text.into();
                true
            }
            _ => false,
        }
    }

    /// Discards the buffer and restores the committed value.
    pub fn cancel(&mut self) -> bool {
        if !self.is_editing() {
            return false;
        }
        self.state = EditorState::Idle;
        true
    }

    /// Editing surface lost focus; same as cancel.
    pub fn blur(&mut self) -> bool {
        self.cancel()
    }

    /// Moves `Editing -> Saving` and returns the value to send.
    ///
    /// Hosts that run the save elsewhere call this, then `finish_commit` when
    /// the save completes.
    pub fn begin_commit(&mut self) -> Option<FieldValue> {
        let EditorState::Editing { buffer } = &self.state else {
            return None;
        };
        let pending = self.field.value_from_input(buffer);
        self.state = EditorState::Saving {
            pending: pending.clone(),
        };
        Some(pending)
    }

    /// Returns to `Idle` after a save completes, successful or not.
    pub fn finish_commit(&mut self) {
        if self.is_saving() {
            self.state = EditorState::Idle;
        }
    }

    /// Runs a full commit through `save` and returns its result.
    pub fn commit_with<T>(&mut self, save: impl FnOnce(FieldValue) -> T) -> Option<T> {
        let pending = self.begin_commit()?;
        let outcome = save(pending);
        self.finish_commit();
        Some(outcome)
    }

    /// Feeds one key. Confirm commits through `save`; cancel discards.
    pub fn handle_key<T>(
        &mut self,
        key: EditorKey,
        save: impl FnOnce(FieldValue) -> T,
    ) -> KeyOutcome<T> {
        match key {
            EditorKey::Confirm => match self.commit_with(save) {
                Some(outcome) => KeyOutcome::Committed(outcome),
                None => KeyOutcome::Ignored,
            },
            EditorKey::Cancel if self.cancel() => KeyOutcome::Cancelled,
            _ => KeyOutcome::Ignored,
        }
    }

    /// Refreshes the committed value from the owner's record. Ignored while
    /// editing so a re-render never clobbers the user's buffer.
    pub fn sync_value(&mut self, value: impl Into<String>) {
        if !self.is_editing() {
            self.value = value.into();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EditorKey, EditorState, FieldEditor, KeyOutcome};
    use crate::model::assignment::Assignment;
    use crate::model::resource::{FieldValue, Resource};
    use crate::model::student::Student;

    fn grade_editor(value: &str) -> FieldEditor {
        FieldEditor::new(Assignment::spec().field("grade").unwrap(), value)
    }

    #[test]
    fn activation_seeds_buffer_from_value() {
        let mut editor = grade_editor("90.00");
        assert!(editor.activate());
        assert_eq!(
            editor.state(),
            &EditorState::Editing {
                buffer: "90.00".to_string()
            }
        );
        assert!(!editor.activate());
    }

    #[test]
    fn cancel_key_restores_previous_value_without_saving() {
        let mut editor = grade_editor("90.00");
        editor.activate();
        editor.input("12");
        assert_eq!(editor.display_text(), "12");

        let mut saved = false;
        let outcome = editor.handle_key(EditorKey::Cancel, |_| saved = true);
        assert_eq!(outcome, KeyOutcome::Cancelled);
        assert!(!saved);
        assert_eq!(editor.display_text(), "90.00");
        assert_eq!(editor.state(), &EditorState::Idle);
    }

    #[test]
    fn blur_discards_buffer() {
        let mut editor = grade_editor("90.00");
        editor.activate();
        editor.input("1");
        assert!(editor.blur());
        assert_eq!(editor.display_text(), "90.00");
    }

    #[test]
    fn confirm_sends_null_for_empty_nullable_field() {
        let mut editor = grade_editor("90.00");
        editor.activate();
        editor.input("");
        let outcome = editor.handle_key(EditorKey::Confirm, |value| value);
        assert_eq!(outcome, KeyOutcome::Committed(FieldValue::Null));
        assert_eq!(editor.state(), &EditorState::Idle);
    }

    #[test]
    fn confirm_sends_empty_text_for_non_nullable_field() {
        let field = Student::spec().field("last_name").unwrap();
        let mut editor = FieldEditor::new(field, "Byron");
        editor.activate();
        editor.input("");
        let value = editor.commit_with(|value| value).unwrap();
        assert_eq!(value, FieldValue::Text(String::new()));
    }

    #[test]
    fn confirm_while_idle_is_ignored() {
        let mut editor = grade_editor("90.00");
        let outcome: KeyOutcome<()> =
            editor.handle_key(EditorKey::Confirm, |_| panic!("must not save"));
        assert_eq!(outcome, KeyOutcome::Ignored);
    }

    #[test]
    fn returns_to_idle_even_when_save_fails() {
        let mut editor = grade_editor("90.00");
        editor.activate();
        editor.input("95");
        let result: Option<Result<(), &str>> = editor.commit_with(|_| Err("boom"));
        assert_eq!(result, Some(Err("boom")));
        assert_eq!(editor.state(), &EditorState::Idle);
        assert_eq!(editor.value(), "90.00");
    }

    #[test]
    fn split_commit_holds_saving_state_until_finished() {
        let mut editor = grade_editor("90.00");
        editor.activate();
        editor.input("80");
        let pending = editor.begin_commit().unwrap();
        assert_eq!(pending, FieldValue::Text("80".to_string()));
        assert!(editor.is_saving());
        assert!(!editor.activate());
        editor.finish_commit();
        editor.sync_value("80.00");
        assert_eq!(editor.display_text(), "80.00");
    }

    #[test]
    fn sync_value_does_not_clobber_active_buffer() {
        let mut editor = grade_editor("90.00");
        editor.activate();
        editor.input("70");
        editor.sync_value("10.00");
        assert_eq!(editor.display_text(), "70");
        editor.cancel();
        assert_eq!(editor.display_text(), "90.00");
    }

    #[test]
    fn key_names_map_to_editor_keys() {
        assert_eq!(EditorKey::from_key_name("Enter"), EditorKey::Confirm);
        assert_eq!(EditorKey::from_key_name("Escape"), EditorKey::Cancel);
        assert_eq!(EditorKey::from_key_name("a"), EditorKey::Other);
    }
}
