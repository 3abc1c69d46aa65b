//! Configuration for Pairing Pears
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{PearsError, Result};

/// Fixed filename of the database, placed next to the executable
pub const DB_FILENAME: &str = "pairing-pears.db";

/// Main configuration for a store instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Path of the single database file
    pub db_path: PathBuf,

    /// Permission bits used when the file is created (Unix only)
    pub file_mode: u32,

    // -------------------------------------------------------------------------
    // Log Configuration
    // -------------------------------------------------------------------------
    /// Sync strategy: how often to fsync commit frames
    pub sync_strategy: SyncStrategy,

    /// Rewrite the file on open once this many commit frames were replayed
    pub compact_threshold: u64,
}

/// Commit log sync strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStrategy {
    /// fsync after every commit (safest, slowest)
    EveryWrite,

    /// fsync after N unsynced commits (balanced durability/performance)
    EveryNEntries { count: usize },
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DB_FILENAME),
            file_mode: 0o600,
            sync_strategy: SyncStrategy::EveryWrite,
            compact_threshold: 1000,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Default config with the database next to the running executable
    pub fn from_executable_dir() -> Result<Self> {
        Ok(Self {
            db_path: default_db_path()?,
            ..Self::default()
        })
    }
}

/// `<directory of current executable>/pairing-pears.db`
pub fn default_db_path() -> Result<PathBuf> {
    let exe = std::env::current_exe().map_err(|source| PearsError::StorageUnavailable {
        path: PathBuf::from(DB_FILENAME),
        source,
    })?;

    let dir = exe.parent().ok_or_else(|| PearsError::StorageUnavailable {
        path: exe.clone(),
        source: std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "executable has no parent directory",
        ),
    })?;

    Ok(dir.join(DB_FILENAME))
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the database file path
    pub fn db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.db_path = path.into();
        self
    }

    /// Set the permission bits for a newly created file
    pub fn file_mode(mut self, mode: u32) -> Self {
        self.config.file_mode = mode;
        self
    }

    /// Set the commit sync strategy
    pub fn sync_strategy(mut self, strategy: SyncStrategy) -> Self {
        self.config.sync_strategy = strategy;
        self
    }

    /// Set the replayed-frame count that triggers compaction on open
    pub fn compact_threshold(mut self, frames: u64) -> Self {
        self.config.compact_threshold = frames;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
