// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reconciliation of complaint collections by natural key.
//!
//! The opaque `id` and the attachment list belong to the local side and are
//! never replaced by an incoming record. Every other field follows the
//! incoming record.

use crate::moment::new_id;
use rti_tracker_domain::{Complaint, NaturalKey};
use std::collections::HashMap;

/// Prefix of synthesized complaint ids.
pub const COMPLAINT_ID_PREFIX: &str = "cmp";

/// Returns the deduplication key of a complaint.
#[must_use]
pub fn natural_key(complaint: &Complaint) -> NaturalKey {
    complaint.natural_key()
}

/// Removes natural key duplicates.
///
/// A later record replaces an earlier one with the same key but takes over
/// the earlier one's position, so output order is first-insertion order.
#[must_use]
pub fn dedupe(complaints: Vec<Complaint>) -> Vec<Complaint> {
    let mut positions: HashMap<NaturalKey, usize> = HashMap::with_capacity(complaints.len());
    let mut unique: Vec<Complaint> = Vec::with_capacity(complaints.len());

    for complaint in complaints {
        let key: NaturalKey = complaint.natural_key();
        if let Some(slot) = positions.get(&key).and_then(|idx| unique.get_mut(*idx)) {
            *slot = complaint;
        } else {
            positions.insert(key, unique.len());
            unique.push(complaint);
        }
    }

    unique
}

/// Folds an incoming record into the existing record with the same key.
///
/// Keeps the existing id and documents. A resolution time that was already
/// recorded survives; otherwise a terminal record is resolved at its
/// incoming `last_updated`.
#[must_use]
pub fn merge_record(existing: &Complaint, incoming: Complaint) -> Complaint {
    let resolved_at: Option<String> = if incoming.is_terminal() {
        existing
            .resolved_at
            .clone()
            .or_else(|| Some(incoming.last_updated.clone()))
    } else {
        None
    };

    Complaint {
        id: existing.id.clone(),
        documents: existing.documents.clone(),
        resolved_at,
        ..incoming
    }
}

/// Prepares a record that matched nothing for insertion.
///
/// A missing id is synthesized and `resolved_at` is made consistent with
/// the status so that reconciling the same input again changes nothing.
#[must_use]
pub fn normalize_inserted(mut incoming: Complaint) -> Complaint {
    if incoming.id.trim().is_empty() {
        incoming.id = new_id(COMPLAINT_ID_PREFIX);
    }

    incoming.resolved_at = if incoming.is_terminal() {
        incoming
            .resolved_at
            .filter(|v| !v.trim().is_empty())
            .or_else(|| Some(incoming.last_updated.clone()))
    } else {
        None
    };

    incoming
}

/// The outcome of a counted reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Reconciliation {
    /// The full reconciled set.
    pub complaints: Vec<Complaint>,
    /// Incoming records that matched nothing and were inserted.
    pub inserted: usize,
    /// Incoming records folded into an existing record.
    pub updated: usize,
}

/// Reconciles an incoming set into an existing set.
///
/// Existing records untouched by any incoming key pass through unchanged
/// and keep their order; inserted records follow them in input order.
#[must_use]
pub fn reconcile(existing: &[Complaint], incoming: Vec<Complaint>) -> Vec<Complaint> {
    reconcile_counted(existing, incoming).complaints
}

/// Reconciles like [`reconcile`] and also counts inserts and updates.
#[must_use]
pub fn reconcile_counted(existing: &[Complaint], incoming: Vec<Complaint>) -> Reconciliation {
    let mut merged: Vec<Complaint> = dedupe(existing.to_vec());
    let mut positions: HashMap<NaturalKey, usize> = merged
        .iter()
        .enumerate()
        .map(|(idx, c)| (c.natural_key(), idx))
        .collect();

    let mut inserted: usize = 0;
    let mut updated: usize = 0;

    for record in incoming {
        let key: NaturalKey = record.natural_key();
        if let Some(slot) = positions.get(&key).and_then(|idx| merged.get_mut(*idx)) {
            *slot = merge_record(slot, record);
            updated += 1;
        } else {
            positions.insert(key, merged.len());
            merged.push(normalize_inserted(record));
            inserted += 1;
        }
    }

    Reconciliation {
        complaints: merged,
        inserted,
        updated,
    }
}
