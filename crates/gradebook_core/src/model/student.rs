//! Student record.

use crate::model::resource::{FieldKind, FieldSpec, RecordId, Resource, ResourceSpec};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

static STUDENT_FIELDS: [FieldSpec; 3] = [
    FieldSpec {
        name: "First Name",
        key: "first_name",
        kind: FieldKind::Text,
        nullable: false,
        required: true,
    },
    FieldSpec {
        name: "Last Name",
        key: "last_name",
        kind: FieldKind::Text,
        nullable: false,
        required: true,
    },
    FieldSpec {
        name: "Birth Date",
        key: "birth_date",
        kind: FieldKind::Date,
        nullable: false,
        required: true,
    },
];

static STUDENT_SPEC: ResourceSpec = ResourceSpec {
    path: "students",
    label: "student",
    parent_param: None,
    parent_keys: &[],
    fields: &STUDENT_FIELDS,
};

/// A tracked student. Top of the record hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: RecordId,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    /// Identity-provider user the server scopes this student to. Read-only.
    #[serde(rename = "clerk_user_id", default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl Resource for Student {
    fn spec() -> &'static ResourceSpec {
        &STUDENT_SPEC
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn parent_id(&self) -> Option<RecordId> {
        None
    }

    fn display_label(&self) -> String {
        self.full_name()
    }
}

#[cfg(test)]
mod tests {
    use super::Student;
    use crate::model::resource::Resource;

    #[test]
    fn parses_server_payload_with_read_only_fields() {
        let student: Student = serde_json::from_str(
            r#"{
                "id": 3,
                "clerk_user_id": "user_123",
                "first_name": "Ada",
                "last_name": "Byron",
                "birth_date": "2012-12-10",
                "created_at": "2024-01-05T10:00:00.123456Z",
                "updated_at": "2024-01-06T10:00:00Z"
            }"#,
        )
        .unwrap();
        assert_eq!(student.id(), 3);
        assert_eq!(student.owner_id.as_deref(), Some("user_123"));
        assert_eq!(student.display_label(), "Ada Byron");
    }

    #[test]
    fn spec_lists_required_name_fields() {
        let spec = Student::spec();
        assert_eq!(spec.collection_path(), "students/");
        assert!(spec.field("first_name").unwrap().required);
        assert!(spec.field("Birth Date").is_some());
        assert!(spec.parent_param.is_none());
    }
}
