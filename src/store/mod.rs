//! Store Module
//!
//! The embedded transactional key-value store behind the data access layer.
//!
//! ## Responsibilities
//! - Own the single database file and its exclusive lock
//! - Rebuild bucket state from the commit log on open
//! - Hand out read and write transactions
//! - Compact the log into a fresh file
//!
//! ## Concurrency Model: Single-Writer / Multiple-Reader (SWMR)
//!
//! - **Writes**: serialized by the `log` mutex. Lock order is always
//!   `log` → `state`.
//! - **Reads**: shared lock on `state`; never touch the file.

mod compaction;
mod state;
mod txn;

use std::fs;
use std::path::Path;

use parking_lot::{Mutex, RwLock};

use crate::config::Config;
use crate::error::{PearsError, Result};
use crate::log::{LogWriter, RecoveryResult};

use state::State;

pub use compaction::CompactionStats;
pub use txn::{ReadTxn, WriteTxn};

/// A single-file bucketed key-value store
pub struct Store {
    config: Config,

    /// Bucket contents (shared by readers, upgraded by the committing writer)
    state: RwLock<State>,

    /// Append handle to the locked file; doubles as the writer lock
    log: Mutex<LogWriter>,

    /// What was found in the file when it was opened
    recovery: RecoveryResult,
}

impl Store {
    /// Open or create a store with the given config
    ///
    /// On startup:
    /// 1. Create the parent directory if needed
    /// 2. Open and exclusively lock the file
    /// 3. Replay committed frames, dropping a torn tail
    /// 4. Compact if the log grew past the threshold
    pub fn open(config: Config) -> Result<Self> {
        let path = config.db_path.clone();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| PearsError::StorageUnavailable {
                    path: path.clone(),
                    source,
                })?;
            }
        }

        let (writer, entries, recovery) =
            LogWriter::open(&path, config.file_mode, config.sync_strategy)?;

        let mut state = State::default();
        for entry in entries {
            for operation in entry.operations {
                state.apply(operation)?;
            }
        }

        tracing::info!(
            "Opened store {} ({} frames replayed, last_lsn={}, {} keys)",
            path.display(),
            recovery.entries_recovered,
            recovery.last_lsn,
            state.key_count()
        );

        let store = Self {
            config,
            state: RwLock::new(state),
            log: Mutex::new(writer),
            recovery,
        };

        let due = compaction::is_due(&store.config, &store.log.lock());
        if due {
            // The replayed log is still valid, so a failed rewrite is not fatal
            if let Err(e) = store.compact() {
                tracing::warn!("Compaction on open failed: {}", e);
            }
        }

        Ok(store)
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified database file
    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open(Config::builder().db_path(path).build())
    }

    // =========================================================================
    // Transactions
    // =========================================================================

    /// Begin a read-only transaction
    pub fn begin_read(&self) -> ReadTxn<'_> {
        ReadTxn::new(self.state.read())
    }

    /// Begin a read-write transaction, waiting for any other writer
    pub fn begin_write(&self) -> WriteTxn<'_> {
        let log = self.log.lock();
        WriteTxn::new(&self.config, log, self.state.upgradable_read())
    }

    /// Run `f` inside a read-only transaction
    pub fn view<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&ReadTxn<'_>) -> Result<T>,
    {
        let txn = self.begin_read();
        f(&txn)
    }

    /// Run `f` inside a read-write transaction.
    ///
    /// Commits when `f` returns `Ok`, rolls back when it returns `Err`.
    pub fn update<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut WriteTxn<'_>) -> Result<T>,
    {
        let mut txn = self.begin_write();
        match f(&mut txn) {
            Ok(value) => {
                txn.commit()?;
                Ok(value)
            }
            Err(e) => {
                txn.rollback();
                Err(e)
            }
        }
    }

    // =========================================================================
    // Maintenance
    // =========================================================================

    /// Rewrite the live state into a fresh file and swap it in
    ///
    /// Also runs on open and after a commit once the log holds
    /// `compact_threshold` frames.
    pub fn compact(&self) -> Result<CompactionStats> {
        let mut log = self.log.lock();
        let state = self.state.read();
        compaction::compact(&self.config, &mut log, &state)
    }

    /// Force any unsynced commits to disk
    pub fn sync(&self) -> Result<()> {
        self.log.lock().sync()
    }

    /// Close the store gracefully
    ///
    /// Syncs the log and releases the file lock
    pub fn close(self) -> Result<()> {
        let mut log = self.log.into_inner();
        log.sync()?;

        tracing::info!("Closed store {}", log.path().display());
        Ok(())
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the database file path
    pub fn path(&self) -> &Path {
        &self.config.db_path
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Recovery statistics from when the store was opened
    pub fn recovery(&self) -> &RecoveryResult {
        &self.recovery
    }

    /// Current length of the database file
    pub fn file_len(&self) -> u64 {
        self.log.lock().len()
    }

    /// LSN of the most recent commit (0 if none)
    pub fn last_lsn(&self) -> u64 {
        self.log.lock().current_lsn() - 1
    }

    /// Names of all buckets
    pub fn bucket_names(&self) -> Vec<String> {
        self.state.read().bucket_names()
    }

    /// Sum of live keys across all buckets
    pub fn key_count(&self) -> usize {
        self.state.read().key_count()
    }
}
