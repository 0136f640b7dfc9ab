// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rti_tracker::Moment;
use rti_tracker_domain::{Category, ComplaintStatus, DisplayStatus};

use crate::tests::helpers::{
    TestStore, create_test_moment, create_test_request, create_test_store,
};
use crate::{
    ApiError, ComplaintResponse, CreateComplaintRequest, UpdateComplaintRequest,
    create_complaint, delete_complaint, list_complaints, update_complaint,
};

#[test]
fn test_create_returns_derived_fields() {
    let now: Moment = create_test_moment();
    let mut store: TestStore = create_test_store();

    let created: ComplaintResponse =
        create_complaint(&mut store, create_test_request("CPGRAMS", "G-1"), &now).unwrap();

    assert!(!created.complaint.id.is_empty());
    assert_eq!(created.complaint.category, Category::Grievance);
    assert_eq!(created.complaint.last_updated, "2026-03-01T10:00:00Z");
    assert_eq!(created.due_date.as_deref(), Some("2026-02-14"));
    assert_eq!(created.days_until_due, Some(-15));
    assert_eq!(created.days_pending, Some(45));
    assert_eq!(created.display_status, DisplayStatus::Overdue);
    assert_eq!(store.remote_mut().count_complaints().unwrap(), 1);
}

#[test]
fn test_create_applies_defaults() {
    let now: Moment = create_test_moment();
    let mut store: TestStore = create_test_store();
    let request: CreateComplaintRequest = CreateComplaintRequest {
        category: Some(String::from("Suggestion")),
        status: None,
        date_lodged: String::new(),
        ..create_test_request("CPGRAMS", "G-1")
    };

    let created: ComplaintResponse = create_complaint(&mut store, request, &now).unwrap();

    assert_eq!(created.complaint.category, Category::Other);
    assert_eq!(created.complaint.status, ComplaintStatus::Submitted);
    assert_eq!(created.complaint.date_lodged, "2026-03-01");
    assert_eq!(created.due_date.as_deref(), Some("2026-03-16"));
}

#[test]
fn test_create_same_key_merges() {
    let now: Moment = create_test_moment();
    let mut store: TestStore = create_test_store();
    let first: ComplaintResponse =
        create_complaint(&mut store, create_test_request("CPGRAMS", "G-1"), &now).unwrap();

    let again: CreateComplaintRequest = CreateComplaintRequest {
        notes: String::from("called the office"),
        ..create_test_request("cpgrams ", " G-1")
    };
    let second: ComplaintResponse = create_complaint(&mut store, again, &now).unwrap();

    assert_eq!(second.complaint.id, first.complaint.id);
    assert_eq!(second.complaint.notes, "called the office");
    assert_eq!(store.complaints().len(), 1);
    assert_eq!(store.remote_mut().count_complaints().unwrap(), 1);
}

#[test]
fn test_create_rejects_unknown_status() {
    let now: Moment = create_test_moment();
    let mut store: TestStore = create_test_store();
    let request: CreateComplaintRequest = CreateComplaintRequest {
        status: Some(String::from("Lost")),
        ..create_test_request("CPGRAMS", "G-1")
    };

    let result: Result<ComplaintResponse, ApiError> = create_complaint(&mut store, request, &now);

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "status"
    ));
    assert!(store.complaints().is_empty());
}

#[test]
fn test_create_rejects_blank_portal() {
    let now: Moment = create_test_moment();
    let mut store: TestStore = create_test_store();

    let result: Result<ComplaintResponse, ApiError> =
        create_complaint(&mut store, create_test_request("  ", "G-1"), &now);

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "portalName"
    ));
}

#[test]
fn test_update_to_terminal_records_resolution() {
    let now: Moment = create_test_moment();
    let mut store: TestStore = create_test_store();
    let created: ComplaintResponse =
        create_complaint(&mut store, create_test_request("CPGRAMS", "G-1"), &now).unwrap();

    let request: UpdateComplaintRequest = UpdateComplaintRequest {
        status: Some(String::from("Resolved")),
        ..UpdateComplaintRequest::default()
    };
    let updated: ComplaintResponse =
        update_complaint(&mut store, &created.complaint.id, request, &now).unwrap();

    assert_eq!(updated.complaint.status, ComplaintStatus::Resolved);
    assert_eq!(
        updated.complaint.resolved_at.as_deref(),
        Some("2026-03-01T10:00:00Z")
    );
    assert_eq!(updated.due_date, None);
    assert_eq!(
        updated.display_status,
        DisplayStatus::Stored(ComplaintStatus::Resolved)
    );
}

#[test]
fn test_update_unknown_complaint_is_not_found() {
    let now: Moment = create_test_moment();
    let mut store: TestStore = create_test_store();

    let result: Result<ComplaintResponse, ApiError> = update_complaint(
        &mut store,
        "missing",
        UpdateComplaintRequest::default(),
        &now,
    );

    assert!(matches!(
        result,
        Err(ApiError::ResourceNotFound { ref resource_type, .. }) if resource_type == "Complaint"
    ));
}

#[test]
fn test_update_onto_existing_key_is_rejected() {
    let now: Moment = create_test_moment();
    let mut store: TestStore = create_test_store();
    create_complaint(&mut store, create_test_request("CPGRAMS", "G-1"), &now).unwrap();
    let second: ComplaintResponse =
        create_complaint(&mut store, create_test_request("CPGRAMS", "G-2"), &now).unwrap();

    let request: UpdateComplaintRequest = UpdateComplaintRequest {
        complaint_id: Some(String::from("g-1")),
        ..UpdateComplaintRequest::default()
    };
    let result: Result<ComplaintResponse, ApiError> =
        update_complaint(&mut store, &second.complaint.id, request, &now);

    assert!(matches!(
        result,
        Err(ApiError::DomainRuleViolation { ref rule, .. }) if rule == "unique_complaint"
    ));
}

#[test]
fn test_delete_removes_complaint() {
    let now: Moment = create_test_moment();
    let mut store: TestStore = create_test_store();
    let created: ComplaintResponse =
        create_complaint(&mut store, create_test_request("CPGRAMS", "G-1"), &now).unwrap();

    delete_complaint(&mut store, &created.complaint.id, &now).unwrap();

    assert!(list_complaints(&store, now.today()).is_empty());
    assert_eq!(store.remote_mut().count_complaints().unwrap(), 0);
}

#[test]
fn test_delete_unknown_complaint_is_not_found() {
    let now: Moment = create_test_moment();
    let mut store: TestStore = create_test_store();

    let result: Result<(), ApiError> = delete_complaint(&mut store, "missing", &now);

    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_list_orders_by_lodged_date_then_update() {
    let now: Moment = create_test_moment();
    let mut store: TestStore = create_test_store();
    let older: CreateComplaintRequest = create_test_request("CPGRAMS", "G-1");
    let newer: CreateComplaintRequest = CreateComplaintRequest {
        date_lodged: String::from("2026-02-01"),
        ..create_test_request("CPGRAMS", "G-2")
    };
    create_complaint(&mut store, older, &now).unwrap();
    create_complaint(&mut store, newer, &now).unwrap();

    let listed: Vec<ComplaintResponse> = list_complaints(&store, now.today());
    let ids: Vec<&str> = listed
        .iter()
        .map(|view| view.complaint.complaint_id.as_str())
        .collect();

    assert_eq!(ids, vec!["G-2", "G-1"]);
}

#[test]
fn test_response_serializes_flat_camel_case() {
    let now: Moment = create_test_moment();
    let mut store: TestStore = create_test_store();
    let created: ComplaintResponse =
        create_complaint(&mut store, create_test_request("CPGRAMS", "G-1"), &now).unwrap();

    let json: serde_json::Value = serde_json::to_value(&created).unwrap();

    assert_eq!(json["complaintId"], "G-1");
    assert_eq!(json["portalName"], "CPGRAMS");
    assert_eq!(json["displayStatus"], "Overdue");
    assert_eq!(json["dueDate"], "2026-02-14");
    assert_eq!(json["daysUntilDue"], -15);
}
