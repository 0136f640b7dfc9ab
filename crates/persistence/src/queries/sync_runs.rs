// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use rti_tracker_domain::SyncRun;

use crate::data_models::SyncRunRow;
use crate::diesel_schema::sync_runs;
use crate::error::PersistenceError;

/// Lists the most recent sync runs, newest first.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `limit` - Maximum number of runs to return
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_sync_runs(
    conn: &mut SqliteConnection,
    limit: i64,
) -> Result<Vec<SyncRun>, PersistenceError> {
    let rows: Vec<SyncRunRow> = sync_runs::table
        .order(sync_runs::id.desc())
        .limit(limit)
        .select(SyncRunRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(SyncRun::from).collect())
}
