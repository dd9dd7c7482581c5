mod common;

use common::{client_for, ScriptedTransport};
use gradebook_core::{
    ApiResponse, Completion, EditableCollection, ErrorKind, Method, Resource, Subject,
};
use serde_json::json;
use std::sync::Arc;

fn loaded_subjects(transport: &Arc<ScriptedTransport>) -> EditableCollection<Subject> {
    transport.respond(
        200,
        json!([
            {"id": 10, "name": "Algebra", "course_description": null, "notes": null, "student": 7},
            {"id": 11, "name": "Latin", "course_description": "Intro", "notes": "", "student": 7},
            {"id": 12, "name": "Art", "course_description": null, "notes": "fun", "student": 7}
        ]),
    );
    let mut subjects = EditableCollection::<Subject>::for_parent(client_for(transport), 7);
    subjects.load().unwrap();
    subjects
}

#[test]
fn declining_confirmation_sends_nothing_and_changes_nothing() {
    let transport = ScriptedTransport::new();
    let mut subjects = loaded_subjects(&transport);
    let before = serde_json::to_string(subjects.rows()).unwrap();

    let mut asked = Vec::new();
    let outcome = subjects
        .delete_record(11, &mut |message: &str| {
            asked.push(message.to_string());
            false
        })
        .unwrap();

    assert_eq!(outcome, Completion::Declined);
    assert_eq!(transport.request_count(), 1);
    assert_eq!(serde_json::to_string(subjects.rows()).unwrap(), before);
    assert_eq!(
        asked,
        vec!["Are you sure you want to permanently delete this subject?".to_string()]
    );
}

#[test]
fn confirmed_delete_removes_record_and_keeps_order() {
    let transport = ScriptedTransport::new();
    let mut subjects = loaded_subjects(&transport);
    transport.respond_empty(204);

    let outcome = subjects.delete_record(11, &mut |_: &str| true).unwrap();
    assert_eq!(outcome, Completion::Applied);

    let request = &transport.requests()[1];
    assert_eq!(request.method, Method::Delete);
    assert_eq!(request.path, "subjects/11");
    assert!(request.body.is_none());

    let ids: Vec<_> = subjects.rows().iter().map(|s| s.id()).collect();
    assert_eq!(ids, vec![10, 12]);
}

#[test]
fn forbidden_delete_keeps_record() {
    let transport = ScriptedTransport::new();
    let mut subjects = loaded_subjects(&transport);
    transport.respond(403, json!({}));

    let err = subjects.delete_record(10, &mut |_: &str| true).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PermissionDenied);
    assert_eq!(subjects.len(), 3);
    assert!(subjects
        .last_error()
        .unwrap()
        .user_message()
        .contains("can't delete that subject"));
}

#[test]
fn delete_of_missing_record_reports_not_found() {
    let transport = ScriptedTransport::new();
    let mut subjects = loaded_subjects(&transport);
    transport.respond(404, json!({}));

    let err = subjects.delete_record(12, &mut |_: &str| true).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(subjects.get(12).is_some());
}

#[test]
fn delete_of_unloaded_row_is_refused_before_prompting() {
    let transport = ScriptedTransport::new();
    let mut subjects = loaded_subjects(&transport);
    let mut asked = false;

    let err = subjects
        .delete_record(99, &mut |_: &str| {
            asked = true;
            true
        })
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ValidationFailure);
    assert!(!asked);
    assert_eq!(transport.request_count(), 1);
}

#[test]
fn delete_completing_after_row_vanished_is_detached() {
    let transport = ScriptedTransport::new();
    let mut subjects = loaded_subjects(&transport);
    transport.respond(
        200,
        json!([
            {"id": 10, "name": "Algebra", "course_description": null, "notes": null, "student": 7},
            {"id": 12, "name": "Art", "course_description": null, "notes": "fun", "student": 7}
        ]),
    );
    subjects.load().unwrap();

    let outcome = subjects
        .complete_delete(11, Ok(ApiResponse::new(204, "")))
        .unwrap();

    assert_eq!(outcome, Completion::Detached);
    let ids: Vec<_> = subjects.rows().iter().map(|s| s.id()).collect();
    assert_eq!(ids, vec![10, 12]);
}
