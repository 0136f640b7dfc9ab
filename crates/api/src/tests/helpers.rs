// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use rti_tracker::{ComplaintStore, MemoryAttachments, MemoryCache, Moment};
use rti_tracker_persistence::Persistence;
use time::macros::datetime;

use crate::{CreateComplaintRequest, UpsertComplaintRequest};

pub type TestStore = ComplaintStore<Persistence, MemoryCache, MemoryAttachments>;

pub fn create_test_moment() -> Moment {
    Moment::from_datetime(datetime!(2026-03-01 10:00:00 UTC)).unwrap()
}

pub fn create_test_store() -> TestStore {
    let persistence: Persistence = Persistence::new_in_memory().unwrap();
    ComplaintStore::new(persistence, MemoryCache::new(), MemoryAttachments::new())
}

pub fn create_test_request(portal_name: &str, complaint_id: &str) -> CreateComplaintRequest {
    CreateComplaintRequest {
        complaint_id: complaint_id.to_string(),
        complaint_name: String::from("Water supply"),
        portal_name: portal_name.to_string(),
        category: Some(String::from("Grievance")),
        date_lodged: String::from("2026-01-15"),
        status: Some(String::from("Pending")),
        department: String::from("Water Works"),
        ..CreateComplaintRequest::default()
    }
}

pub fn create_test_upsert(portal_name: &str, complaint_id: &str) -> UpsertComplaintRequest {
    UpsertComplaintRequest {
        complaint_id: Some(complaint_id.to_string()),
        portal_name: Some(portal_name.to_string()),
        category: Some(String::from("RTI")),
        date_lodged: Some(String::from("2026-02-20")),
        status: Some(String::from("Submitted")),
        ..UpsertComplaintRequest::default()
    }
}
