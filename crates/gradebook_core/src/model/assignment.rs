//! Assignment record, owned by a subject.

use crate::model::decimal;
use crate::model::resource::{FieldKind, FieldSpec, RecordId, Resource, ResourceSpec};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

static ASSIGNMENT_FIELDS: [FieldSpec; 4] = [
    FieldSpec {
        name: "Name",
        key: "name",
        kind: FieldKind::Text,
        nullable: false,
        required: true,
    },
    FieldSpec {
        name: "Notes",
        key: "notes",
        kind: FieldKind::LongText,
        nullable: false,
        required: false,
    },
    FieldSpec {
        name: "Date Completed",
        key: "date_completed",
        kind: FieldKind::Date,
        nullable: true,
        required: false,
    },
    FieldSpec {
        name: "Grade",
        key: "grade",
        kind: FieldKind::Decimal,
        nullable: true,
        required: false,
    },
];

static ASSIGNMENT_SPEC: ResourceSpec = ResourceSpec {
    path: "assignments",
    label: "assignment",
    parent_param: Some("subject"),
    parent_keys: &["student", "subject"],
    fields: &ASSIGNMENT_FIELDS,
};

/// One piece of work within a subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub date_completed: Option<NaiveDate>,
    #[serde(default)]
    pub completed: bool,
    #[serde(with = "decimal", default)]
    pub grade: Option<f64>,
    /// Student owning the parent subject.
    pub student: RecordId,
    /// Owning subject.
    pub subject: RecordId,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Resource for Assignment {
    fn spec() -> &'static ResourceSpec {
        &ASSIGNMENT_SPEC
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn parent_id(&self) -> Option<RecordId> {
        Some(self.subject)
    }

    fn display_label(&self) -> String {
        format!("{} (subject {})", self.name, self.subject)
    }
}
