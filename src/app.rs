//! Application facade
//!
//! What the UI process talks to. `startup` opens the database and `shutdown`
//! closes it; every operation in between forwards to [`Database`]. If startup
//! failed, each operation reports [`PearsError::NotInitialized`] instead of
//! touching storage.

use crate::config::Config;
use crate::db::Database;
use crate::error::{PearsError, Result};
use crate::record::{Developer, Group};
use crate::store::CompactionStats;

/// Lifecycle owner of the database handle
pub struct App {
    config: Config,
    db: Option<Database>,
}

impl App {
    /// Create an app that will open the database described by `config`
    pub fn new(config: Config) -> Self {
        Self { config, db: None }
    }

    /// Create an app using the database next to the executable
    pub fn from_executable_dir() -> Result<Self> {
        Ok(Self::new(Config::from_executable_dir()?))
    }

    /// Open the database. A failure is logged and returned; the app stays
    /// usable but every data operation fails with `NotInitialized`.
    pub fn startup(&mut self) -> Result<()> {
        if self.db.is_some() {
            return Ok(());
        }

        match Database::open(self.config.clone()) {
            Ok(db) => {
                self.db = Some(db);
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to initialize database: {}", e);
                Err(e)
            }
        }
    }

    /// Close the database if it is open
    pub fn shutdown(&mut self) -> Result<()> {
        match self.db.take() {
            Some(db) => db.close(),
            None => Ok(()),
        }
    }

    /// True between a successful `startup` and `shutdown`
    pub fn is_ready(&self) -> bool {
        self.db.is_some()
    }

    /// The open database
    pub fn db(&self) -> Result<&Database> {
        self.db.as_ref().ok_or(PearsError::NotInitialized)
    }

    // =========================================================================
    // Developers
    // =========================================================================

    pub fn get_all_developers(&self) -> Result<Vec<Developer>> {
        self.db()?.get_all_developers()
    }

    pub fn add_developer(&self, name: &str) -> Result<Developer> {
        self.db()?.add_developer(name)
    }

    pub fn delete_developer(&self, id: &str) -> Result<()> {
        self.db()?.delete_developer(id)
    }

    pub fn clear_all_developers(&self) -> Result<()> {
        self.db()?.clear_all_developers()
    }

    // =========================================================================
    // Groups
    // =========================================================================

    pub fn get_all_groups(&self) -> Result<Vec<Group>> {
        self.db()?.get_all_groups()
    }

    pub fn add_group(&self, name: &str) -> Result<Group> {
        self.db()?.add_group(name)
    }

    pub fn update_group(&self, id: &str, name: &str, members: Vec<String>) -> Result<()> {
        self.db()?.update_group(id, name, members)
    }

    pub fn delete_group(&self, id: &str) -> Result<()> {
        self.db()?.delete_group(id)
    }

    pub fn clear_all_groups(&self) -> Result<()> {
        self.db()?.clear_all_groups()
    }

    pub fn auto_assign_developers(&self) -> Result<Vec<Group>> {
        self.db()?.auto_assign_developers()
    }

    pub fn clear_group_members(&self) -> Result<Vec<Group>> {
        self.db()?.clear_group_members()
    }

    // =========================================================================
    // Maintenance
    // =========================================================================

    pub fn compact(&self) -> Result<CompactionStats> {
        self.db()?.store().compact()
    }
}

impl Drop for App {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            tracing::warn!("Failed to close database on drop: {}", e);
        }
    }
}
