mod common;

use common::{client_for, ScriptedTransport};
use gradebook_core::{
    Completion, EditableCollection, ErrorKind, LoadState, Method, Resource, Student, Subject,
};
use serde_json::json;

fn student_rows() -> serde_json::Value {
    json!([
        {"id": 2, "first_name": "Ben", "last_name": "Ng", "birth_date": "2011-04-01"},
        {"id": 1, "first_name": "Ada", "last_name": "Byron", "birth_date": "2012-12-10"}
    ])
}

#[test]
fn load_replaces_collection_in_server_order() {
    let transport = ScriptedTransport::new();
    transport.respond(200, student_rows());
    let mut students = EditableCollection::<Student>::new(client_for(&transport));

    assert!(students.rows().is_empty());
    assert_eq!(students.load().unwrap(), Completion::Applied);

    let ids: Vec<_> = students.rows().iter().map(|s| s.id()).collect();
    assert_eq!(ids, vec![2, 1]);
    assert_eq!(students.load_state(), &LoadState::Ready);

    let request = &transport.requests()[0];
    assert_eq!(request.method, Method::Get);
    assert_eq!(request.path, "students/");
    assert!(request.query.is_empty());
}

#[test]
fn subjects_for_a_student_are_filtered_by_query_and_result() {
    let transport = ScriptedTransport::new();
    transport.respond(
        200,
        json!([
            {"id": 10, "name": "Algebra", "course_description": null, "notes": null, "student": 7},
            {"id": 11, "name": "Latin", "course_description": "", "notes": "", "student": 8}
        ]),
    );
    let mut subjects = EditableCollection::<Subject>::for_parent(client_for(&transport), 7);
    subjects.load().unwrap();

    let request = &transport.requests()[0];
    assert_eq!(request.path, "subjects/");
    assert_eq!(request.query, vec![("student".to_string(), "7".to_string())]);
    assert_eq!(subjects.len(), 1);
    assert!(subjects.rows().iter().all(|s| s.student == 7));
}

#[test]
fn load_failure_hides_table_and_surfaces_taxonomy_error() {
    let transport = ScriptedTransport::new();
    transport.respond(403, json!({"detail": "nope"}));
    let mut students = EditableCollection::<Student>::new(client_for(&transport));

    let err = students.load().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PermissionDenied);
    assert!(students.rows().is_empty());
    assert_eq!(
        students.load_error().unwrap().user_message(),
        "You don't have permission to access that."
    );
}

#[test]
fn failed_reload_hides_previously_loaded_rows() {
    let transport = ScriptedTransport::new();
    transport.respond(200, student_rows());
    transport.respond(500, json!({}));
    let mut students = EditableCollection::<Student>::new(client_for(&transport));

    students.load().unwrap();
    assert_eq!(students.len(), 2);
    let err = students.load().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TransientOrUnknownFailure);
    assert!(students.is_empty());
}

#[test]
fn not_found_on_load_is_reported_as_not_found() {
    let transport = ScriptedTransport::new();
    transport.respond(404, json!({}));
    let mut students = EditableCollection::<Student>::new(client_for(&transport));

    let err = students.load().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.user_message(), "That probably doesn't exist.");
}

#[test]
fn malformed_body_is_a_generic_failure() {
    let transport = ScriptedTransport::new();
    transport.respond(200, json!({"unexpected": true}));
    let mut students = EditableCollection::<Student>::new(client_for(&transport));

    let err = students.load().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TransientOrUnknownFailure);
    assert!(matches!(students.load_state(), LoadState::Failed(_)));
}

#[test]
fn every_request_gets_a_fresh_token() {
    let transport = ScriptedTransport::new();
    transport.respond(200, student_rows());
    transport.respond(200, student_rows());
    let mut students = EditableCollection::<Student>::new(client_for(&transport));

    students.load().unwrap();
    students.load().unwrap();
    assert_eq!(transport.tokens(), vec!["token-1", "token-2"]);
}
