//! Tests for the data access layer: developers, groups, assignment, records

mod record_tests;

use std::path::{Path, PathBuf};

use pairing_pears::config::Config;
use pairing_pears::Database;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

pub fn open_db(path: &Path) -> Database {
    let config = Config::builder().db_path(path).compact_threshold(0).build();
    Database::open(config).unwrap()
}

pub fn setup_temp_db() -> (TempDir, PathBuf, Database) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("pairing-pears.db");
    let db = open_db(&path);
    (temp_dir, path, db)
}

/// Reopen the database at `path`, as after an application restart
pub fn reopen(db: Database, path: &Path) -> Database {
    db.close().unwrap();
    open_db(path)
}
