// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The database driving a complaint store as its authoritative source.

use crate::Persistence;
use crate::tests::{create_test_complaint, create_test_document, create_test_moment};
use rti_tracker::{
    ComplaintStore, CoreError, Feed, FeedComplaint, FeedProfile, MemoryAttachments, MemoryCache,
    Moment, UpsertSummary,
};
use rti_tracker_domain::{
    Category, Complaint, ComplaintDraft, ComplaintPatch, ComplaintStatus, DomainError, NaturalKey,
    SyncRun,
};

type DbStore = ComplaintStore<Persistence, MemoryCache, MemoryAttachments>;

fn db_store() -> DbStore {
    ComplaintStore::new(
        Persistence::new_in_memory().unwrap(),
        MemoryCache::new(),
        MemoryAttachments::new(),
    )
}

fn draft(portal_name: &str, complaint_id: &str) -> ComplaintDraft {
    ComplaintDraft {
        complaint_id: complaint_id.to_string(),
        portal_name: portal_name.to_string(),
        category: Category::Rti,
        date_lodged: String::from("2026-02-01"),
        status: ComplaintStatus::Filed,
        ..ComplaintDraft::default()
    }
}

#[test]
fn test_create_is_written_to_database() {
    let now: Moment = create_test_moment();
    let mut store: DbStore = db_store();

    let saved: Complaint = store.create(draft("RTI Online", "R-1"), &now).unwrap();

    let stored: Option<Complaint> = store.remote_mut().get_complaint(&saved.id).unwrap();
    assert_eq!(stored, Some(saved));
}

#[test]
fn test_create_with_known_key_updates_existing_row() {
    let now: Moment = create_test_moment();
    let mut store: DbStore = db_store();
    let first: Complaint = store.create(draft("RTI Online", "R-1"), &now).unwrap();

    let second: Complaint = store
        .create(
            ComplaintDraft {
                status: ComplaintStatus::FirstAppeal,
                ..draft("rti online", "r-1")
            },
            &now,
        )
        .unwrap();

    assert_eq!(second.id, first.id);
    assert_eq!(store.remote_mut().count_complaints().unwrap(), 1);
    assert_eq!(store.complaints().len(), 1);
    assert_eq!(store.complaints()[0].status, ComplaintStatus::FirstAppeal);
}

#[test]
fn test_update_to_taken_key_is_rejected() {
    let now: Moment = create_test_moment();
    let mut store: DbStore = db_store();
    store.create(draft("RTI Online", "R-1"), &now).unwrap();
    let other: Complaint = store.create(draft("RTI Online", "R-2"), &now).unwrap();

    let patch: ComplaintPatch = ComplaintPatch {
        complaint_id: Some(String::from("R-1")),
        ..ComplaintPatch::default()
    };

    assert_eq!(
        store.update(&other.id, patch, &now),
        Err(CoreError::DomainViolation(DomainError::DuplicateComplaint {
            key: NaturalKey::new("RTI Online", "R-1").to_string(),
        }))
    );
}

#[test]
fn test_update_unknown_is_rejected_as_not_found() {
    let now: Moment = create_test_moment();
    let mut store: DbStore = db_store();

    assert_eq!(
        store.update("ghost", ComplaintPatch::default(), &now),
        Err(CoreError::ComplaintNotFound(String::from("ghost")))
    );
}

#[test]
fn test_resolving_persists_resolution_time() {
    let now: Moment = create_test_moment();
    let mut store: DbStore = db_store();
    let saved: Complaint = store.create(draft("RTI Online", "R-1"), &now).unwrap();

    let patch: ComplaintPatch = ComplaintPatch {
        status: Some(ComplaintStatus::Resolved),
        ..ComplaintPatch::default()
    };
    store.update(&saved.id, patch, &now).unwrap();

    let stored: Complaint = store
        .remote_mut()
        .get_complaint(&saved.id)
        .unwrap()
        .unwrap();
    assert_eq!(stored.resolved_at.as_deref(), Some("2026-03-01T10:00:00Z"));
}

#[test]
fn test_delete_removes_row() {
    let now: Moment = create_test_moment();
    let mut store: DbStore = db_store();
    let saved: Complaint = store.create(draft("RTI Online", "R-1"), &now).unwrap();

    store.delete(&saved.id, &now).unwrap();

    assert_eq!(store.remote_mut().count_complaints().unwrap(), 0);
    assert_eq!(
        store.delete(&saved.id, &now),
        Err(CoreError::ComplaintNotFound(saved.id.clone()))
    );
}

#[test]
fn test_load_reads_database() {
    let mut db: Persistence = Persistence::new_in_memory().unwrap();
    db.insert_complaint(&create_test_complaint("a", "P", "1"))
        .unwrap();
    let mut store: DbStore =
        ComplaintStore::new(db, MemoryCache::new(), MemoryAttachments::new());

    assert_eq!(store.load(), 1);
    assert_eq!(store.complaints()[0].id, "a");
}

#[test]
fn test_bulk_upsert_writes_reconciled_records() {
    let now: Moment = create_test_moment();
    let mut store: DbStore = db_store();
    let saved: Complaint = store.create(draft("RTI Online", "R-1"), &now).unwrap();

    let mut refreshed: Complaint = create_test_complaint("", "RTI Online", "R-1");
    refreshed.status = ComplaintStatus::Closed;
    let summary: UpsertSummary = store
        .bulk_upsert(vec![refreshed, create_test_complaint("", "RTI Online", "R-2")])
        .unwrap();

    assert_eq!(summary.inserted, 1);
    assert_eq!(summary.updated, 1);

    let rows: Vec<Complaint> = store.remote_mut().list_complaints().unwrap();
    assert_eq!(rows.len(), 2);
    let merged: &Complaint = rows.iter().find(|c| c.id == saved.id).unwrap();
    assert_eq!(merged.status, ComplaintStatus::Closed);
}

#[test]
fn test_feed_sync_records_runs_in_database() {
    let now: Moment = create_test_moment();
    let mut store: DbStore = db_store();
    let feed: Feed = Feed {
        synced_at: Some(String::from("2026-03-01T06:00:00Z")),
        complaints: vec![FeedComplaint {
            complaint_id: Some(String::from("UMC-77")),
            status: Some(String::from("Pending")),
            date_lodged: Some(String::from("2026-02-20")),
            ..FeedComplaint::default()
        }],
    };
    let profile: FeedProfile = FeedProfile::smart_umc();

    store.sync_feed(feed.clone(), &profile, false, &now).unwrap();
    store.sync_feed(feed, &profile, false, &now).unwrap();

    assert_eq!(store.remote_mut().count_complaints().unwrap(), 1);
    let runs: Vec<SyncRun> = store.remote_mut().list_sync_runs(10).unwrap();
    let statuses: Vec<&str> = runs.iter().map(|run| run.status.as_str()).collect();
    assert_eq!(statuses, vec!["skipped", "ok"]);
    assert_eq!(runs[1].count_imported, 1);
}

#[test]
fn test_bulk_upsert_from_stale_store_keeps_database_row() {
    let dir: tempfile::TempDir = tempfile::tempdir().unwrap();
    let path: std::path::PathBuf = dir.path().join("tracker.db");
    let mut store: DbStore = ComplaintStore::new(
        Persistence::new_with_file(&path).unwrap(),
        MemoryCache::new(),
        MemoryAttachments::new(),
    );
    assert_eq!(store.load(), 0);

    let mut writer: Persistence = Persistence::new_with_file(&path).unwrap();
    let mut resolved: Complaint = create_test_complaint("A", "P", "1");
    resolved.status = ComplaintStatus::Resolved;
    resolved.resolved_at = Some(String::from("2026-01-20T00:00:00Z"));
    resolved.documents = vec![create_test_document("doc1")];
    writer.insert_complaint(&resolved).unwrap();

    let mut refreshed: Complaint = create_test_complaint("", "P", "1");
    refreshed.status = ComplaintStatus::Resolved;
    refreshed.last_updated = String::from("2026-03-01T00:00:00Z");
    store.bulk_upsert(vec![refreshed]).unwrap();

    let row: Complaint = writer.get_complaint("A").unwrap().unwrap();
    assert_eq!(row.documents, vec![create_test_document("doc1")]);
    assert_eq!(row.resolved_at.as_deref(), Some("2026-01-20T00:00:00Z"));
    assert_eq!(writer.count_complaints().unwrap(), 1);

    assert_eq!(store.complaints().len(), 1);
    assert_eq!(store.complaints()[0].id, "A");
    assert_eq!(store.complaints()[0].documents.len(), 1);
}
