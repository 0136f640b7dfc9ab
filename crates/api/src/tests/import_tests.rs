// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rti_tracker::{Feed, FeedComplaint, Moment};
use rti_tracker_domain::{Category, Complaint, ComplaintStatus};

use crate::tests::helpers::{
    TestStore, create_test_moment, create_test_request, create_test_store, create_test_upsert,
};
use crate::{
    ApiError, BulkUpsertRequest, BulkUpsertResponse, ComplaintResponse, FeedSyncRequest,
    FeedSyncResponse, ImportDocument, ImportResponse, ListSyncRunsResponse,
    UpsertComplaintRequest, bulk_upsert, complaint_from_upsert, create_complaint,
    import_complaints, list_sync_runs, parse_import_document, sync_feed,
};

#[test]
fn test_upsert_record_defaults() {
    let now: Moment = create_test_moment();
    let record: UpsertComplaintRequest = UpsertComplaintRequest {
        complaint_id: Some(String::from(" 77 ")),
        ..UpsertComplaintRequest::default()
    };

    let complaint: Complaint = complaint_from_upsert(record, 0, &now).unwrap();

    assert_eq!(complaint.complaint_id, "77");
    assert_eq!(complaint.portal_name, "Unknown");
    assert_eq!(complaint.category, Category::Other);
    assert_eq!(complaint.status, ComplaintStatus::Submitted);
    assert_eq!(complaint.date_lodged, "2026-03-01");
    assert_eq!(complaint.last_updated, "2026-03-01T10:00:00Z");
}

#[test]
fn test_upsert_record_error_names_index_and_field() {
    let now: Moment = create_test_moment();
    let record: UpsertComplaintRequest = UpsertComplaintRequest {
        date_lodged: Some(String::from("03/01/2026")),
        ..create_test_upsert("CPGRAMS", "G-1")
    };

    let result: Result<Complaint, ApiError> = complaint_from_upsert(record, 3, &now);

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "complaints[3].dateLodged"
    ));
}

#[test]
fn test_bulk_upsert_counts_inserts_and_updates() {
    let now: Moment = create_test_moment();
    let mut store: TestStore = create_test_store();
    let existing: ComplaintResponse =
        create_complaint(&mut store, create_test_request("CPGRAMS", "G-1"), &now).unwrap();

    let refreshed: UpsertComplaintRequest = UpsertComplaintRequest {
        status: Some(String::from("First Appeal")),
        ..create_test_upsert("cpgrams", "G-1")
    };
    let request: BulkUpsertRequest = BulkUpsertRequest {
        complaints: vec![refreshed, create_test_upsert("RTI Online", "R-9")],
    };

    let summary: BulkUpsertResponse = bulk_upsert(&mut store, request, &now).unwrap();

    assert_eq!(
        summary,
        BulkUpsertResponse {
            upserted: 2,
            inserted: 1,
            updated: 1,
        }
    );
    let merged: &Complaint = store.get(&existing.complaint.id).unwrap();
    assert_eq!(merged.status, ComplaintStatus::FirstAppeal);
    assert_eq!(store.remote_mut().count_complaints().unwrap(), 2);
}

#[test]
fn test_bulk_upsert_with_invalid_record_writes_nothing() {
    let now: Moment = create_test_moment();
    let mut store: TestStore = create_test_store();
    let request: BulkUpsertRequest = BulkUpsertRequest {
        complaints: vec![
            create_test_upsert("CPGRAMS", "G-1"),
            UpsertComplaintRequest {
                complaint_id: Some(String::from("  ")),
                ..UpsertComplaintRequest::default()
            },
        ],
    };

    let result: Result<BulkUpsertResponse, ApiError> = bulk_upsert(&mut store, request, &now);

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "complaints[1].complaintId"
    ));
    assert!(store.complaints().is_empty());
    assert_eq!(store.remote_mut().count_complaints().unwrap(), 0);
}

#[test]
fn test_parse_import_document_shapes() {
    let bare: ImportDocument = parse_import_document(r#"[{"complaintId": "1"}]"#).unwrap();
    assert_eq!(bare.into_records().len(), 1);

    let wrapped: ImportDocument =
        parse_import_document(r#"{"complaints": [{"complaintId": "1"}, {"complaintId": "2"}]}"#)
            .unwrap();
    assert_eq!(wrapped.into_records().len(), 2);

    assert!(matches!(
        parse_import_document(r#"{"records": 3}"#),
        Err(ApiError::InvalidInput { .. })
    ));
}

#[test]
fn test_import_records_a_sync_run() {
    let now: Moment = create_test_moment();
    let mut store: TestStore = create_test_store();
    let document: ImportDocument = ImportDocument::List(vec![
        create_test_upsert("CPGRAMS", "G-1"),
        create_test_upsert("CPGRAMS", "G-2"),
    ]);

    let response: ImportResponse =
        import_complaints(&mut store, document, "backup.json", &now).unwrap();

    assert_eq!(response.source, "backup.json");
    assert_eq!(response.summary.inserted, 2);

    let runs: ListSyncRunsResponse = list_sync_runs(store.remote_mut(), 20).unwrap();
    assert_eq!(runs.sync_runs.len(), 1);
    assert_eq!(runs.sync_runs[0].source, "backup.json");
    assert_eq!(runs.sync_runs[0].status, "ok");
    assert_eq!(runs.sync_runs[0].count_imported, 2);
}

#[test]
fn test_feed_sync_imports_then_skips() {
    let now: Moment = create_test_moment();
    let mut store: TestStore = create_test_store();
    let request: FeedSyncRequest = FeedSyncRequest {
        feed: Feed {
            synced_at: Some(String::from("2026-03-01T06:00:00Z")),
            complaints: vec![FeedComplaint {
                complaint_id: Some(String::from("UMC-1")),
                status: Some(String::from("work in progress")),
                date_lodged: Some(String::from("2026-02-10")),
                ..FeedComplaint::default()
            }],
        },
        force: false,
    };

    let first: FeedSyncResponse = sync_feed(&mut store, request.clone(), &now).unwrap();
    assert_eq!(first.imported, 1);
    assert!(!first.skipped);
    assert_eq!(
        store.complaints()[0].status,
        ComplaintStatus::InProgress
    );

    let second: FeedSyncResponse = sync_feed(&mut store, request, &now).unwrap();
    assert!(second.skipped);
    assert_eq!(second.imported, 0);

    let runs: ListSyncRunsResponse = list_sync_runs(store.remote_mut(), 20).unwrap();
    let statuses: Vec<&str> = runs
        .sync_runs
        .iter()
        .map(|run| run.status.as_str())
        .collect();
    assert_eq!(statuses, vec!["skipped", "ok"]);
}

#[test]
fn test_feed_sync_request_parses_flat() {
    let request: FeedSyncRequest = serde_json::from_str(
        r#"{"syncedAt": "run-1", "complaints": [{"complaintId": "UMC-1"}], "force": true}"#,
    )
    .unwrap();

    assert!(request.force);
    assert_eq!(request.feed.synced_at.as_deref(), Some("run-1"));
    assert_eq!(request.feed.complaints.len(), 1);
}
