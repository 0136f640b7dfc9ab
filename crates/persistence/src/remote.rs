// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The database as the store's authoritative source.
//!
//! Creates and updates run through the same lifecycle rules as the local
//! fallback, against the rows currently in the database.

use rti_tracker::{
    Change, Command, ComplaintRemote, CoreError, Moment, State, TransitionResult, apply,
};
use rti_tracker_domain::{Complaint, ComplaintDraft, ComplaintPatch, DomainError, SyncRun};
use tracing::debug;

use crate::Persistence;
use crate::error::PersistenceError;

impl Persistence {
    fn current_state(&mut self) -> Result<State, PersistenceError> {
        Ok(State::from_complaints(self.list_complaints()?))
    }

    fn apply_command(&mut self, command: Command, now: &Moment) -> Result<Change, PersistenceError> {
        let state: State = self.current_state()?;
        let result: TransitionResult = apply(&state, command, now)?;
        Ok(result.change)
    }
}

impl ComplaintRemote for Persistence {
    type Error = PersistenceError;

    fn fetch_all(&mut self) -> Result<Vec<Complaint>, Self::Error> {
        self.list_complaints()
    }

    fn create(&mut self, draft: &ComplaintDraft, now: &Moment) -> Result<Complaint, Self::Error> {
        match self.apply_command(Command::Create(draft.clone()), now)? {
            Change::Created(complaint) => {
                self.insert_complaint(&complaint)?;
                Ok(complaint)
            }
            Change::Merged(complaint) => {
                debug!(id = %complaint.id, "Create folded into existing complaint");
                self.update_complaint(&complaint)?;
                Ok(complaint)
            }
            other => Err(unexpected_change(&other)),
        }
    }

    fn update(
        &mut self,
        id: &str,
        patch: &ComplaintPatch,
        now: &Moment,
    ) -> Result<Complaint, Self::Error> {
        let command: Command = Command::Update {
            id: id.to_string(),
            patch: patch.clone(),
        };
        match self.apply_command(command, now)? {
            Change::Updated(complaint) => {
                self.update_complaint(&complaint)?;
                Ok(complaint)
            }
            other => Err(unexpected_change(&other)),
        }
    }

    fn delete(&mut self, id: &str) -> Result<(), Self::Error> {
        self.delete_complaint(id)
    }

    fn bulk_upsert(&mut self, complaints: &[Complaint]) -> Result<Vec<Complaint>, Self::Error> {
        self.save_all_by_natural_key(complaints)
    }

    fn record_sync_run(&mut self, run: &SyncRun) -> Result<(), Self::Error> {
        Self::record_sync_run(self, run).map(|_| ())
    }

    fn rejection(error: &Self::Error) -> Option<CoreError> {
        match error {
            PersistenceError::RuleViolation(err) => Some(err.clone()),
            PersistenceError::ComplaintNotFound(id) => Some(CoreError::ComplaintNotFound(id.clone())),
            PersistenceError::DuplicateComplaint(key) => Some(CoreError::DomainViolation(
                DomainError::DuplicateComplaint { key: key.clone() },
            )),
            _ => None,
        }
    }
}

fn unexpected_change(change: &Change) -> PersistenceError {
    PersistenceError::DatabaseError(format!("unexpected transition outcome: {change:?}"))
}
