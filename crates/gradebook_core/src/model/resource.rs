//! Resource descriptors shared by every entity kind.
//!
//! # Responsibility
//! - Map UI-facing field names to request keys, input kinds and nullability.
//! - Convert raw editor/form text into wire values.
//!
//! # Invariants
//! - An empty value for a nullable field becomes an explicit `null`, never `""`.
//! - Field lookup accepts the request key or the display name.
//!
//! # See also
//! - `model::decimal` for how grades cross the wire.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Server-assigned identity shared by all record kinds.
pub type RecordId = i64;

/// Input surface used to edit a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Single-line text.
    Text,
    /// Multi-line free text.
    LongText,
    /// Calendar date in `YYYY-MM-DD` form.
    Date,
    /// Decimal number, sent as its typed text.
    Decimal,
}

impl FieldKind {
    /// Returns the HTML-style input type hint for this kind.
    pub fn input_type(self) -> &'static str {
        match self {
            Self::Text | Self::LongText => "text",
            Self::Date => "date",
            Self::Decimal => "number",
        }
    }
}

/// One editable attribute of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Human-facing column name.
    pub name: &'static str,
    /// JSON key used in request and response bodies.
    pub key: &'static str,
    pub kind: FieldKind,
    /// Whether the server stores "no value" as `null`.
    pub nullable: bool,
    /// Whether the creation form refuses to submit this field empty.
    pub required: bool,
}

impl FieldSpec {
    /// Converts raw input text into the value sent to the server.
    pub fn value_from_input(&self, text: &str) -> FieldValue {
        if self.nullable && text.trim().is_empty() {
            FieldValue::Null
        } else {
            FieldValue::Text(text.to_string())
        }
    }

    /// Returns true when `name` refers to this field by key or display name.
    pub fn matches(&self, name: &str) -> bool {
        let name = name.trim();
        self.key == name || self.name.eq_ignore_ascii_case(name)
    }
}

/// Value committed for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Explicit "no value"; serialized as JSON `null`.
    Null,
    Text(String),
}

impl FieldValue {
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Text(text) => Value::String(text.clone()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Static description of one REST resource.
#[derive(Debug)]
pub struct ResourceSpec {
    /// Collection path segment, e.g. `subjects`.
    pub path: &'static str,
    /// Singular entity label used in messages, e.g. `subject`.
    pub label: &'static str,
    /// Query parameter used to filter the collection by parent identity.
    pub parent_param: Option<&'static str>,
    /// Back-reference keys a create request must carry.
    pub parent_keys: &'static [&'static str],
    /// Editable attributes, in display order.
    pub fields: &'static [FieldSpec],
}

impl ResourceSpec {
    /// Looks up a field by request key or display name.
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|field| field.matches(name))
    }

    /// Path of the whole collection, with the trailing slash the API expects.
    pub fn collection_path(&self) -> String {
        format!("{}/", self.path)
    }

    /// Path of one record.
    pub fn record_path(&self, id: RecordId) -> String {
        format!("{}/{id}", self.path)
    }
}

/// A record kind managed through the generic collection and form.
pub trait Resource: Clone + Serialize + DeserializeOwned {
    fn spec() -> &'static ResourceSpec;

    fn id(&self) -> RecordId;

    /// Identity of the owning parent, if this kind has one.
    fn parent_id(&self) -> Option<RecordId>;

    /// Short human label used in prompts and CLI output.
    fn display_label(&self) -> String;
}

/// Renders one field of a record as display text.
///
/// `null` renders as an empty string; numbers and booleans use their JSON
/// spelling.
pub fn display_field<R: Resource>(record: &R, key: &str) -> Option<String> {
    let raw = serde_json::to_value(record).ok()?;
    let value = raw.get(key)?;
    Some(match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    })
}

/// Returns `record` with one key replaced by `value`.
///
/// All other keys survive unchanged because the record is round-tripped
/// through its own serialized form.
pub fn merge_field<R: Resource>(record: &R, key: &str, value: Value) -> serde_json::Result<R> {
    // Why: decoding through the record's own serde impl re-applies field
    // adapters (dates, decimals), so typed input is validated the same way
    // server payloads are.
    let mut raw = serde_json::to_value(record)?;
    if let Value::Object(map) = &mut raw {
        map.insert(key.to_string(), value);
    }
    serde_json::from_value(raw)
}

#[cfg(test)]
mod tests {
    use super::{FieldKind, FieldSpec, FieldValue};

    const GRADE: FieldSpec = FieldSpec {
        name: "Grade",
        key: "grade",
        kind: FieldKind::Decimal,
        nullable: true,
        required: false,
    };

    const FIRST_NAME: FieldSpec = FieldSpec {
        name: "First Name",
        key: "first_name",
        kind: FieldKind::Text,
        nullable: false,
        required: true,
    };

    #[test]
    fn empty_nullable_input_becomes_null() {
        assert_eq!(GRADE.value_from_input(""), FieldValue::Null);
        assert_eq!(GRADE.value_from_input("   "), FieldValue::Null);
        assert_eq!(GRADE.value_from_input("").to_json(), serde_json::Value::Null);
    }

    #[test]
    fn empty_required_text_stays_text() {
        assert_eq!(
            FIRST_NAME.value_from_input(""),
            FieldValue::Text(String::new())
        );
    }

    #[test]
    fn field_matches_key_or_display_name() {
        assert!(FIRST_NAME.matches("first_name"));
        assert!(FIRST_NAME.matches("first name"));
        assert!(!FIRST_NAME.matches("last_name"));
    }
}
