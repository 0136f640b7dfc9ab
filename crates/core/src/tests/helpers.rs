// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Change, Command, ComplaintRemote, CoreError, Moment, State, apply};
use rti_tracker_domain::{
    AttachmentRef, Category, Complaint, ComplaintDraft, ComplaintPatch, ComplaintStatus, SyncRun,
};
use time::macros::datetime;

pub fn create_test_moment() -> Moment {
    Moment::from_datetime(datetime!(2026-03-01 10:00:00 UTC)).unwrap()
}

pub fn create_later_moment() -> Moment {
    Moment::from_datetime(datetime!(2026-03-05 16:30:00 UTC)).unwrap()
}

pub fn create_test_draft(portal_name: &str, complaint_id: &str) -> ComplaintDraft {
    ComplaintDraft {
        complaint_id: complaint_id.to_string(),
        complaint_name: String::from("Water supply"),
        portal_name: portal_name.to_string(),
        category: Category::Grievance,
        date_lodged: String::from("2026-02-01"),
        status: ComplaintStatus::Submitted,
        ..ComplaintDraft::default()
    }
}

pub fn create_test_complaint(id: &str, portal_name: &str, complaint_id: &str) -> Complaint {
    Complaint {
        id: id.to_string(),
        complaint_id: complaint_id.to_string(),
        complaint_name: String::new(),
        portal_name: portal_name.to_string(),
        category: Category::Rti,
        description: String::new(),
        date_lodged: String::from("2026-01-15"),
        status: ComplaintStatus::Pending,
        department: String::new(),
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
        size: 1024,
        added_at: String::from("2026-01-20T00:00:00Z"),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestRemoteError {
    Offline,
    Rejected(CoreError),
}

impl std::fmt::Display for TestRemoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Offline => write!(f, "remote offline"),
            Self::Rejected(err) => write!(f, "remote rejected: {err}"),
        }
    }
}

/// A remote backed by its own state that can be switched offline.
#[derive(Debug, Default)]
pub struct TestRemote {
    pub online: bool,
    pub state: State,
    pub sync_runs: Vec<SyncRun>,
}

impl TestRemote {
    pub fn online() -> Self {
        Self {
            online: true,
            ..Self::default()
        }
    }

    pub fn offline() -> Self {
        Self::default()
    }

    fn run(&mut self, command: Command, now: &Moment) -> Result<Change, TestRemoteError> {
        if !self.online {
            return Err(TestRemoteError::Offline);
        }
        let result = apply(&self.state, command, now).map_err(TestRemoteError::Rejected)?;
        self.state = result.new_state;
        Ok(result.change)
    }
}

impl ComplaintRemote for TestRemote {
    type Error = TestRemoteError;

    fn fetch_all(&mut self) -> Result<Vec<Complaint>, Self::Error> {
        if !self.online {
            return Err(TestRemoteError::Offline);
        }
        Ok(self.state.complaints.clone())
    }

    fn create(&mut self, draft: &ComplaintDraft, now: &Moment) -> Result<Complaint, Self::Error> {
        let change: Change = self.run(Command::Create(draft.clone()), now)?;
        Ok(change.complaint().cloned().unwrap())
    }

    fn update(
        &mut self,
        id: &str,
        patch: &ComplaintPatch,
        now: &Moment,
    ) -> Result<Complaint, Self::Error> {
        let change: Change = self.run(
            Command::Update {
                id: id.to_string(),
                patch: patch.clone(),
            },
            now,
        )?;
        Ok(change.complaint().cloned().unwrap())
    }

    fn delete(&mut self, id: &str) -> Result<(), Self::Error> {
        self.run(Command::Delete { id: id.to_string() }, &create_test_moment())?;
        Ok(())
    }

    fn bulk_upsert(&mut self, complaints: &[Complaint]) -> Result<Vec<Complaint>, Self::Error> {
        if !self.online {
            return Err(TestRemoteError::Offline);
        }
        self.state.complaints = crate::reconcile(&self.state.complaints, complaints.to_vec());
        Ok(complaints
            .iter()
            .filter_map(|c| {
                self.state
                    .complaints
                    .iter()
                    .find(|s| s.natural_key() == c.natural_key())
                    .cloned()
            })
            .collect())
    }

    fn record_sync_run(&mut self, run: &SyncRun) -> Result<(), Self::Error> {
        self.sync_runs.push(run.clone());
        Ok(())
    }

    fn rejection(error: &Self::Error) -> Option<CoreError> {
        match error {
            TestRemoteError::Offline => None,
            TestRemoteError::Rejected(err) => Some(err.clone()),
        }
    }
}
