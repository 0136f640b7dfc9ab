// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Complaint mutations.
//!
//! The `natural_key` column carries a unique constraint, so no two rows can
//! describe the same portal complaint.

use diesel::prelude::*;
use diesel::SqliteConnection;
use rti_tracker::merge_record;
use rti_tracker_domain::{Complaint, NaturalKey};
use tracing::{debug, info};

use crate::data_models::ComplaintRecord;
use crate::diesel_schema::complaints;
use crate::error::PersistenceError;
use crate::queries::complaints::find_by_natural_key;

/// Inserts a new complaint row.
///
/// # Errors
///
/// Returns `DuplicateComplaint` if a row already holds the natural key, or
/// another error if the insert fails.
pub fn insert_complaint(
    conn: &mut SqliteConnection,
    complaint: &Complaint,
) -> Result<(), PersistenceError> {
    let record: ComplaintRecord = ComplaintRecord::from_complaint(complaint)?;

    diesel::insert_into(complaints::table)
        .values(&record)
        .execute(conn)
        .map_err(|e| match PersistenceError::from(e) {
            PersistenceError::DuplicateComplaint(_) => {
                PersistenceError::DuplicateComplaint(record.natural_key.clone())
            }
            other => other,
        })?;

    debug!(id = %complaint.id, key = %record.natural_key, "Inserted complaint");
    Ok(())
}

/// Overwrites the row with the complaint's id.
///
/// # Errors
///
/// Returns `ComplaintNotFound` if no row has the id, `DuplicateComplaint` if
/// the new natural key belongs to another row, or another error if the
/// update fails.
pub fn update_complaint(
    conn: &mut SqliteConnection,
    complaint: &Complaint,
) -> Result<(), PersistenceError> {
    let record: ComplaintRecord = ComplaintRecord::from_complaint(complaint)?;

    let affected: usize = diesel::update(complaints::table.filter(complaints::id.eq(&record.id)))
        .set(&record)
        .execute(conn)
        .map_err(|e| match PersistenceError::from(e) {
            PersistenceError::DuplicateComplaint(_) => {
                PersistenceError::DuplicateComplaint(record.natural_key.clone())
            }
            other => other,
        })?;

    if affected == 0 {
        return Err(PersistenceError::ComplaintNotFound(complaint.id.clone()));
    }

    debug!(id = %complaint.id, "Updated complaint");
    Ok(())
}

/// Deletes the row with this id.
///
/// # Errors
///
/// Returns `ComplaintNotFound` if no row has the id.
pub fn delete_complaint(conn: &mut SqliteConnection, id: &str) -> Result<(), PersistenceError> {
    let affected: usize =
        diesel::delete(complaints::table.filter(complaints::id.eq(id))).execute(conn)?;

    if affected == 0 {
        return Err(PersistenceError::ComplaintNotFound(id.to_string()));
    }

    info!(id, "Deleted complaint");
    Ok(())
}

/// Writes a complaint onto the row holding its natural key.
///
/// An existing row absorbs the incoming record under the reconciliation
/// rule: it keeps its id, its documents and any resolution time it already
/// recorded. Without a matching row the record is inserted as is.
///
/// # Returns
///
/// The complaint as stored.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn save_by_natural_key(
    conn: &mut SqliteConnection,
    complaint: &Complaint,
) -> Result<Complaint, PersistenceError> {
    let key: NaturalKey = complaint.natural_key();

    match find_by_natural_key(conn, &key)? {
        Some(existing) => {
            let stored: Complaint = merge_record(&existing, complaint.clone());
            update_complaint(conn, &stored)?;
            Ok(stored)
        }
        None => {
            insert_complaint(conn, complaint)?;
            Ok(complaint.clone())
        }
    }
}

/// Saves many complaints by natural key in one transaction.
///
/// # Returns
///
/// The complaints as stored, in input order.
///
/// # Errors
///
/// Returns an error if any write fails; nothing is written in that case.
pub fn save_all_by_natural_key(
    conn: &mut SqliteConnection,
    complaints: &[Complaint],
) -> Result<Vec<Complaint>, PersistenceError> {
    conn.transaction(|conn| {
        complaints
            .iter()
            .map(|complaint| save_by_natural_key(conn, complaint))
            .collect::<Result<Vec<Complaint>, PersistenceError>>()
    })
    .inspect(|stored| info!(count = stored.len(), "Upserted complaints by natural key"))
}
