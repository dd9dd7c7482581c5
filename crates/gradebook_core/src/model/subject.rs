//! Subject record, owned by a student.

use crate::model::resource::{FieldKind, FieldSpec, RecordId, Resource, ResourceSpec};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

static SUBJECT_FIELDS: [FieldSpec; 3] = [
    FieldSpec {
        name: "Name",
        key: "name",
        kind: FieldKind::Text,
        nullable: false,
        required: true,
    },
    FieldSpec {
        name: "Course Description",
        key: "course_description",
        kind: FieldKind::LongText,
        nullable: true,
        required: false,
    },
    FieldSpec {
        name: "Notes",
        key: "notes",
        kind: FieldKind::LongText,
        nullable: true,
        required: false,
    },
];

static SUBJECT_SPEC: ResourceSpec = ResourceSpec {
    path: "subjects",
    label: "subject",
    parent_param: Some("student"),
    parent_keys: &["student"],
    fields: &SUBJECT_FIELDS,
};

/// A subject studied by one student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub course_description: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Owning student.
    pub student: RecordId,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Resource for Subject {
    fn spec() -> &'static ResourceSpec {
        &SUBJECT_SPEC
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn parent_id(&self) -> Option<RecordId> {
        Some(self.student)
    }

    fn display_label(&self) -> String {
        format!("Student {}'s {}", self.student, self.name)
    }
}
