// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod initialization_tests;
mod remote_tests;

use rti_tracker::Moment;
use rti_tracker_domain::{AttachmentRef, Category, Complaint, ComplaintStatus, SyncRun};
use time::macros::datetime;

pub fn create_test_moment() -> Moment {
    Moment::from_datetime(datetime!(2026-03-01 10:00:00 UTC)).unwrap()
}

pub fn create_test_complaint(id: &str, portal_name: &str, complaint_id: &str) -> Complaint {
    Complaint {
        id: id.to_string(),
        complaint_id: complaint_id.to_string(),
        complaint_name: String::from("Streetlight outage"),
        portal_name: portal_name.to_string(),
        category: Category::Grievance,
        description: String::new(),
        date_lodged: String::from("2026-01-15"),
        status: ComplaintStatus::Pending,
        department: String::from("Electrical"),
        office_email: String::new(),
        office_phone: String::new(),
        expected_response_date: None,
        documents: Vec::new(),
        notes: String::new(),
        section_data: None,
        last_updated: String::from("2026-01-15T00:00:00Z"),
        resolved_at: None,
    }
}

pub fn create_test_document(id: &str) -> AttachmentRef {
    AttachmentRef {
        id: id.to_string(),
        name: format!("{id}.pdf"),
        mime_type: String::from("application/pdf"),
        size: 2048,
        added_at: String::from("2026-01-20T00:00:00Z"),
    }
}

pub fn create_test_sync_run(source: &str, status: &str, count_imported: u32) -> SyncRun {
    SyncRun {
        id: None,
        source: source.to_string(),
        status: status.to_string(),
        count_imported,
        message: None,
        created_at: String::from("2026-03-01T10:00:00Z"),
    }
}
