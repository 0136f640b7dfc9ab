// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the RTI complaint tracker.
//!
//! This crate provides:
//!
//! - [`Persistence`], a Diesel `SQLite` adapter for complaints and sync runs
//!   that also serves as the store's authoritative [`ComplaintRemote`],
//! - [`JsonFileCache`], a JSON snapshot of complaints and feed checkpoints,
//! - [`FsAttachmentStore`], attachment blobs kept in a directory.
//!
//! ## Schema
//!
//! Migrations are embedded and applied whenever a database is opened.
//! `complaints.natural_key` is unique, so a portal complaint can only be
//! stored once no matter how many times it is imported.
//!
//! ## Testing
//!
//! Every call to [`Persistence::new_in_memory`] gets its own shared-cache
//! in-memory database, so tests never see each other's rows.
//!
//! [`ComplaintRemote`]: rti_tracker::ComplaintRemote

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use rti_tracker_domain::{Complaint, NaturalKey, SyncRun};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

mod attachments;
mod backend;
mod cache;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod remote;

#[cfg(test)]
mod tests;

pub use attachments::{AttachmentError, FsAttachmentStore};
pub use cache::{CacheError, JsonFileCache};
pub use error::PersistenceError;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Number of sync runs returned when no limit is given.
pub const DEFAULT_SYNC_RUN_LIMIT: i64 = 20;

/// Persistence adapter for complaints and sync runs.
pub struct Persistence {
    conn: SqliteConnection,
}

impl std::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persistence").finish_non_exhaustive()
    }
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:memdb_test_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Checks that the database answers queries.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn health_check(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::probe(&mut self.conn)
    }

    // ========================================================================
    // Complaints
    // ========================================================================

    /// Lists every complaint, most recently lodged first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is malformed.
    pub fn list_complaints(&mut self) -> Result<Vec<Complaint>, PersistenceError> {
        queries::complaints::list_complaints(&mut self.conn)
    }

    /// Retrieves a complaint by opaque id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_complaint(&mut self, id: &str) -> Result<Option<Complaint>, PersistenceError> {
        queries::complaints::get_complaint(&mut self.conn, id)
    }

    /// Retrieves the complaint holding a natural key.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_by_natural_key(
        &mut self,
        key: &NaturalKey,
    ) -> Result<Option<Complaint>, PersistenceError> {
        queries::complaints::find_by_natural_key(&mut self.conn, key)
    }

    /// Counts stored complaints.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_complaints(&mut self) -> Result<i64, PersistenceError> {
        queries::complaints::count_complaints(&mut self.conn)
    }

    /// Inserts a new complaint.
    ///
    /// # Errors
    ///
    /// Returns an error if the natural key is taken or the insert fails.
    pub fn insert_complaint(&mut self, complaint: &Complaint) -> Result<(), PersistenceError> {
        mutations::complaints::insert_complaint(&mut self.conn, complaint)
    }

    /// Overwrites the complaint with the same id.
    ///
    /// # Errors
    ///
    /// Returns an error if no such complaint exists or the update fails.
    pub fn update_complaint(&mut self, complaint: &Complaint) -> Result<(), PersistenceError> {
        mutations::complaints::update_complaint(&mut self.conn, complaint)
    }

    /// Deletes a complaint.
    ///
    /// # Errors
    ///
    /// Returns an error if no such complaint exists.
    pub fn delete_complaint(&mut self, id: &str) -> Result<(), PersistenceError> {
        mutations::complaints::delete_complaint(&mut self.conn, id)
    }

    /// Writes a complaint onto the row holding its natural key.
    ///
    /// The stored documents and any recorded resolution time survive.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn save_by_natural_key(&mut self, complaint: &Complaint) -> Result<Complaint, PersistenceError> {
        mutations::complaints::save_by_natural_key(&mut self.conn, complaint)
    }

    /// Saves many complaints by natural key in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if any write fails; nothing is written in that case.
    pub fn save_all_by_natural_key(
        &mut self,
        complaints: &[Complaint],
    ) -> Result<Vec<Complaint>, PersistenceError> {
        mutations::complaints::save_all_by_natural_key(&mut self.conn, complaints)
    }

    // ========================================================================
    // Sync Runs
    // ========================================================================

    /// Records an import or feed synchronization.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn record_sync_run(&mut self, run: &SyncRun) -> Result<i64, PersistenceError> {
        mutations::sync_runs::record_sync_run(&mut self.conn, run)
    }

    /// Lists the most recent sync runs, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_sync_runs(&mut self, limit: i64) -> Result<Vec<SyncRun>, PersistenceError> {
        queries::sync_runs::list_sync_runs(&mut self.conn, limit)
    }
}
