// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Complaint queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use rti_tracker_domain::{Complaint, NaturalKey};
use tracing::debug;

use crate::data_models::ComplaintRow;
use crate::diesel_schema::complaints;
use crate::error::PersistenceError;

/// Lists every complaint, most recently lodged first.
///
/// Ties on the lodged date are broken by the most recent update.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be converted.
pub fn list_complaints(conn: &mut SqliteConnection) -> Result<Vec<Complaint>, PersistenceError> {
    let rows: Vec<ComplaintRow> = complaints::table
        .order((
            complaints::date_lodged.desc(),
            complaints::last_updated.desc(),
        ))
        .select(ComplaintRow::as_select())
        .load(conn)?;

    debug!(count = rows.len(), "Loaded complaint rows");

    rows.into_iter().map(ComplaintRow::into_complaint).collect()
}

/// Retrieves a complaint by opaque id.
///
/// # Errors
///
/// Returns an error if the query fails.
/// Returns `Ok(None)` if no row has this id.
pub fn get_complaint(
    conn: &mut SqliteConnection,
    id: &str,
) -> Result<Option<Complaint>, PersistenceError> {
    let row: Option<ComplaintRow> = complaints::table
        .filter(complaints::id.eq(id))
        .select(ComplaintRow::as_select())
        .first(conn)
        .optional()?;

    row.map(ComplaintRow::into_complaint).transpose()
}

/// Retrieves the complaint holding a natural key.
///
/// # Errors
///
/// Returns an error if the query fails.
/// Returns `Ok(None)` if no row holds this key.
pub fn find_by_natural_key(
    conn: &mut SqliteConnection,
    key: &NaturalKey,
) -> Result<Option<Complaint>, PersistenceError> {
    let row: Option<ComplaintRow> = complaints::table
        .filter(complaints::natural_key.eq(key.as_str()))
        .select(ComplaintRow::as_select())
        .first(conn)
        .optional()?;

    row.map(ComplaintRow::into_complaint).transpose()
}

/// Counts stored complaints.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_complaints(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(complaints::table.count().get_result(conn)?)
}
