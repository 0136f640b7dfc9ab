// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use rti_tracker_domain::SyncRun;
use tracing::info;

use crate::data_models::NewSyncRun;
use crate::diesel_schema::sync_runs;
use crate::error::PersistenceError;

/// Records an import or feed synchronization.
///
/// # Returns
///
/// The id assigned to the new row.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn record_sync_run(conn: &mut SqliteConnection, run: &SyncRun) -> Result<i64, PersistenceError> {
    let id: i64 = diesel::insert_into(sync_runs::table)
        .values(NewSyncRun::from(run))
        .returning(sync_runs::id)
        .get_result(conn)?;

    info!(
        id,
        source = %run.source,
        status = %run.status,
        count_imported = run.count_imported,
        "Recorded sync run"
    );

    Ok(id)
}
