// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend initialization tests.

use crate::tests::create_test_complaint;
use crate::{Persistence, PersistenceError};
use rti_tracker_domain::Complaint;

#[test]
fn test_persistence_initialization() {
    let result: Result<Persistence, PersistenceError> = Persistence::new_in_memory();
    assert!(result.is_ok());
}

#[test]
fn test_health_check_on_fresh_database() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    assert_eq!(persistence.health_check(), Ok(()));
}

#[test]
fn test_multiple_in_memory_instances_are_isolated() {
    let mut db1: Persistence = Persistence::new_in_memory().unwrap();
    let mut db2: Persistence = Persistence::new_in_memory().unwrap();

    db1.insert_complaint(&create_test_complaint("a", "CPGRAMS", "G-1"))
        .unwrap();

    assert_eq!(db1.count_complaints().unwrap(), 1, "db1 should have 1 complaint");
    assert_eq!(db2.count_complaints().unwrap(), 0, "db2 should be isolated");
}

#[test]
fn test_migrations_applied_on_initialization() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();

    assert!(
        persistence.list_complaints().is_ok(),
        "Migrations must have applied for the complaints table to exist"
    );
    assert!(
        persistence.list_sync_runs(10).is_ok(),
        "Migrations must have applied for the sync_runs table to exist"
    );
}

#[test]
fn test_file_database_survives_reopen() {
    let dir: tempfile::TempDir = tempfile::tempdir().unwrap();
    let path: std::path::PathBuf = dir.path().join("tracker.db");

    {
        let mut persistence: Persistence = Persistence::new_with_file(&path).unwrap();
        persistence
            .insert_complaint(&create_test_complaint("a", "CPGRAMS", "G-1"))
            .unwrap();
    }

    let mut reopened: Persistence = Persistence::new_with_file(&path).unwrap();
    let stored: Vec<Complaint> = reopened.list_complaints().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, "a");
}
