// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::error::CoreError;
use crate::merge::{COMPLAINT_ID_PREFIX, dedupe, merge_record};
use crate::moment::{Moment, new_id};
use crate::state::{Change, State, TransitionResult};
use rti_tracker_domain::{
    AttachmentRef, Complaint, ComplaintDraft, ComplaintPatch, DomainError, NaturalKey, validate_complaint,
};

/// Applies a command to the current state, producing a new state.
///
/// # Arguments
///
/// * `state` - The current state (immutable)
/// * `command` - The command to apply
/// * `now` - The instant the transition happens
///
/// # Returns
///
/// * `Ok(TransitionResult)` containing the new state and what changed
/// * `Err(CoreError)` if the command is invalid
///
/// # Errors
///
/// Returns an error if:
/// - The command violates domain rules
/// - The command names a complaint that does not exist
pub fn apply(state: &State, command: Command, now: &Moment) -> Result<TransitionResult, CoreError> {
    match command {
        Command::Create(draft) => apply_create(state, draft, now),
        Command::Update { id, patch } => apply_update(state, &id, patch, now),
        Command::Delete { id } => {
            let Some(position) = state.complaints.iter().position(|c| c.id == id) else {
                return Err(CoreError::ComplaintNotFound(id));
            };

            let mut new_state: State = state.clone();
            let complaint: Complaint = new_state.complaints.remove(position);
            let released: Vec<AttachmentRef> = complaint.documents.clone();

            Ok(TransitionResult {
                new_state,
                change: Change::Deleted {
                    complaint,
                    released,
                },
            })
        }
        Command::ReplaceAll(complaints) => {
            let new_state: State = State {
                complaints: dedupe(complaints),
            };
            let count: usize = new_state.len();
            Ok(TransitionResult {
                new_state,
                change: Change::Replaced { count },
            })
        }
        Command::Clear => Ok(TransitionResult {
            new_state: State::new(),
            change: Change::Cleared,
        }),
    }
}

/// Builds a complaint from creation input.
///
/// Blank lodged dates default to today. A terminal status is resolved at the
/// explicitly supplied time, or now.
///
/// # Errors
///
/// Returns an error if the resulting record fails validation.
pub fn complaint_from_draft(draft: ComplaintDraft, now: &Moment) -> Result<Complaint, DomainError> {
    let id: String = draft
        .id
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| new_id(COMPLAINT_ID_PREFIX));

    let date_lodged: String = if draft.date_lodged.trim().is_empty() {
        now.date_string()
    } else {
        draft.date_lodged
    };

    let resolved_at: Option<String> = if draft.status.is_terminal() {
        draft
            .resolved_at
            .filter(|v| !v.trim().is_empty())
            .or_else(|| Some(now.timestamp().to_string()))
    } else {
        None
    };

    let complaint: Complaint = Complaint {
        id,
        complaint_id: draft.complaint_id.trim().to_string(),
        complaint_name: draft.complaint_name,
        portal_name: draft.portal_name.trim().to_string(),
        category: draft.category,
        description: draft.description,
        date_lodged,
        status: draft.status,
        department: draft.department,
        office_email: draft.office_email,
        office_phone: draft.office_phone,
        expected_response_date: draft
            .expected_response_date
            .filter(|v| !v.trim().is_empty()),
        documents: draft.documents,
        notes: draft.notes,
        section_data: draft.section_data,
        last_updated: now.timestamp().to_string(),
        resolved_at,
    };

    validate_complaint(&complaint)?;
    Ok(complaint)
}

fn apply_create(
    state: &State,
    draft: ComplaintDraft,
    now: &Moment,
) -> Result<TransitionResult, CoreError> {
    let explicit_resolution: Option<String> = draft
        .resolved_at
        .clone()
        .filter(|v| !v.trim().is_empty());
    let complaint: Complaint = complaint_from_draft(draft, now)?;
    let key: NaturalKey = complaint.natural_key();

    let mut new_state: State = state.clone();

    // Same real-world complaint: keep the local identity, attachments and
    // any resolution time already recorded
    if let Some(slot) = new_state
        .complaints
        .iter_mut()
        .find(|c| c.natural_key() == key)
    {
        let mut merged: Complaint = merge_record(slot, complaint);
        if merged.is_terminal()
            && let Some(value) = explicit_resolution
        {
            merged.resolved_at = Some(value);
        }
        *slot = merged.clone();
        return Ok(TransitionResult {
            new_state,
            change: Change::Merged(merged),
        });
    }

    new_state.complaints.insert(0, complaint.clone());
    Ok(TransitionResult {
        new_state,
        change: Change::Created(complaint),
    })
}

fn apply_update(
    state: &State,
    id: &str,
    patch: ComplaintPatch,
    now: &Moment,
) -> Result<TransitionResult, CoreError> {
    let Some(position) = state.complaints.iter().position(|c| c.id == id) else {
        return Err(CoreError::ComplaintNotFound(id.to_string()));
    };
    let Some(current) = state.complaints.get(position) else {
        return Err(CoreError::ComplaintNotFound(id.to_string()));
    };

    let updated: Complaint = patch_complaint(current, patch, now);
    validate_complaint(&updated)?;

    let key: NaturalKey = updated.natural_key();
    if state
        .complaints
        .iter()
        .any(|c| c.id != updated.id && c.natural_key() == key)
    {
        return Err(CoreError::DomainViolation(
            DomainError::DuplicateComplaint {
                key: key.to_string(),
            },
        ));
    }

    let mut new_state: State = state.clone();
    if let Some(slot) = new_state.complaints.get_mut(position) {
        *slot = updated.clone();
    }

    Ok(TransitionResult {
        new_state,
        change: Change::Updated(updated),
    })
}

/// Applies a patch to a complaint without validating the result.
///
/// `resolved_at` follows the status: a terminal record keeps an explicit
/// or already recorded resolution time (else now); any other record has
/// it cleared.
#[must_use]
pub fn patch_complaint(current: &Complaint, patch: ComplaintPatch, now: &Moment) -> Complaint {
    let mut next: Complaint = current.clone();

    if let Some(v) = patch.complaint_id {
        next.complaint_id = v.trim().to_string();
    }
    if let Some(v) = patch.complaint_name {
        next.complaint_name = v;
    }
    if let Some(v) = patch.portal_name {
        next.portal_name = v.trim().to_string();
    }
    if let Some(v) = patch.category {
        next.category = v;
    }
    if let Some(v) = patch.description {
        next.description = v;
    }
    if let Some(v) = patch.date_lodged {
        next.date_lodged = v;
    }
    if let Some(v) = patch.status {
        next.status = v;
    }
    if let Some(v) = patch.department {
        next.department = v;
    }
    if let Some(v) = patch.office_email {
        next.office_email = v;
    }
    if let Some(v) = patch.office_phone {
        next.office_phone = v;
    }
    if let Some(v) = patch.expected_response_date {
        next.expected_response_date = Some(v).filter(|v| !v.trim().is_empty());
    }
    if let Some(v) = patch.documents {
        next.documents = v;
    }
    if let Some(v) = patch.notes {
        next.notes = v;
    }
    if let Some(v) = patch.section_data {
        next.section_data = Some(v);
    }

    next.last_updated = now.timestamp().to_string();
    next.resolved_at = if next.is_terminal() {
        patch
            .resolved_at
            .filter(|v| !v.trim().is_empty())
            .or_else(|| current.resolved_at.clone())
            .or_else(|| Some(now.timestamp().to_string()))
    } else {
        None
    };

    next
}
