//! Read and write transactions
//!
//! ## Isolation
//! - `ReadTxn` holds a shared lock: a stable snapshot for its lifetime.
//! - `WriteTxn` holds the writer mutex plus an upgradable read lock, so
//!   readers keep running while it stages changes. Touched buckets are
//!   copied into `staged`; commit upgrades to an exclusive lock only to
//!   install them.
//!
//! A thread must not begin a write while it holds a read transaction on the
//! same store; the upgrade would wait on its own read lock.

use std::collections::BTreeMap;

use parking_lot::{MutexGuard, RwLockReadGuard, RwLockUpgradableReadGuard, RwLockWriteGuard};

use crate::bucket::Bucket;
use crate::config::Config;
use crate::error::{PearsError, Result};
use crate::log::{LogWriter, Operation};

use super::compaction;
use super::state::State;

/// Read-only transaction over a consistent snapshot
pub struct ReadTxn<'a> {
    state: RwLockReadGuard<'a, State>,
}

impl<'a> ReadTxn<'a> {
    pub(crate) fn new(state: RwLockReadGuard<'a, State>) -> Self {
        Self { state }
    }

    /// Get a bucket by name
    pub fn bucket(&self, name: &str) -> Result<&Bucket> {
        self.state
            .bucket(name)
            .ok_or_else(|| PearsError::BucketNotFound(name.to_string()))
    }

    /// Get a value from a bucket
    pub fn get(&self, bucket: &str, key: &[u8]) -> Result<Option<&[u8]>> {
        Ok(self.bucket(bucket)?.get(key))
    }

    /// Check whether a bucket exists
    pub fn has_bucket(&self, name: &str) -> bool {
        self.state.bucket(name).is_some()
    }

    /// Names of all buckets in sorted order
    pub fn bucket_names(&self) -> Vec<String> {
        self.state.bucket_names()
    }
}

/// Read-write transaction. Changes become visible only on `commit`.
pub struct WriteTxn<'a> {
    config: &'a Config,
    log: MutexGuard<'a, LogWriter>,
    base: RwLockUpgradableReadGuard<'a, State>,

    /// Copy-on-write buckets; `None` marks a deleted bucket
    staged: BTreeMap<String, Option<Bucket>>,

    /// Operations in issue order, written as one frame on commit
    operations: Vec<Operation>,
}

impl<'a> WriteTxn<'a> {
    pub(crate) fn new(
        config: &'a Config,
        log: MutexGuard<'a, LogWriter>,
        base: RwLockUpgradableReadGuard<'a, State>,
    ) -> Self {
        Self {
            config,
            log,
            base,
            staged: BTreeMap::new(),
            operations: Vec::new(),
        }
    }

    // =========================================================================
    // Buckets
    // =========================================================================

    /// Get a bucket by name, including staged changes
    pub fn bucket(&self, name: &str) -> Result<&Bucket> {
        let bucket = match self.staged.get(name) {
            Some(staged) => staged.as_ref(),
            None => self.base.bucket(name),
        };
        bucket.ok_or_else(|| PearsError::BucketNotFound(name.to_string()))
    }

    /// Check whether a bucket exists, including staged changes
    pub fn has_bucket(&self, name: &str) -> bool {
        self.bucket(name).is_ok()
    }

    /// Create an empty bucket. Fails if it already exists.
    pub fn create_bucket(&mut self, name: &str) -> Result<()> {
        if self.has_bucket(name) {
            return Err(PearsError::BucketExists(name.to_string()));
        }

        self.staged.insert(name.to_string(), Some(Bucket::new()));
        self.operations.push(Operation::CreateBucket {
            bucket: name.to_string(),
        });
        Ok(())
    }

    /// Create a bucket unless it exists. Returns whether it was created.
    pub fn create_bucket_if_missing(&mut self, name: &str) -> Result<bool> {
        if self.has_bucket(name) {
            return Ok(false);
        }
        self.create_bucket(name)?;
        Ok(true)
    }

    /// Delete a bucket and all of its keys. Fails if it does not exist.
    pub fn delete_bucket(&mut self, name: &str) -> Result<()> {
        if !self.has_bucket(name) {
            return Err(PearsError::BucketNotFound(name.to_string()));
        }

        self.staged.insert(name.to_string(), None);
        self.operations.push(Operation::DeleteBucket {
            bucket: name.to_string(),
        });
        Ok(())
    }

    // =========================================================================
    // Keys
    // =========================================================================

    /// Get a value, including staged changes
    pub fn get(&self, bucket: &str, key: &[u8]) -> Result<Option<&[u8]>> {
        Ok(self.bucket(bucket)?.get(key))
    }

    /// Put a key-value pair
    pub fn put(&mut self, bucket: &str, key: &[u8], value: Vec<u8>) -> Result<()> {
        self.bucket_mut(bucket)?.put(key.to_vec(), value.clone());
        self.operations.push(Operation::Put {
            bucket: bucket.to_string(),
            key: key.to_vec(),
            value,
        });
        Ok(())
    }

    /// Delete a key. A missing key is not an error; returns whether it existed.
    pub fn delete(&mut self, bucket: &str, key: &[u8]) -> Result<bool> {
        if !self.bucket(bucket)?.contains_key(key) {
            return Ok(false);
        }

        self.bucket_mut(bucket)?.delete(key);
        self.operations.push(Operation::Delete {
            bucket: bucket.to_string(),
            key: key.to_vec(),
        });
        Ok(true)
    }

    // =========================================================================
    // Completion
    // =========================================================================

    /// Number of operations staged so far
    pub fn pending_operations(&self) -> usize {
        self.operations.len()
    }

    /// Write all staged operations as one frame and publish them.
    ///
    /// Returns the frame's LSN, or `None` when nothing was staged. Once the
    /// log holds `compact_threshold` frames it is compacted before the
    /// writer lock is released; the returned LSN then refers to the old log.
    pub fn commit(self) -> Result<Option<u64>> {
        let WriteTxn {
            config,
            mut log,
            base,
            staged,
            operations,
        } = self;

        if operations.is_empty() {
            return Ok(None);
        }

        let count = operations.len();
        let lsn = log.append(operations)?;

        let mut state = RwLockUpgradableReadGuard::upgrade(base);
        state.install(staged);

        tracing::debug!("Committed LSN {} ({} operations)", lsn, count);

        if compaction::is_due(config, &log) {
            // Readers may resume; the writer lock keeps other commits out
            let state = RwLockWriteGuard::downgrade(state);
            // The commit is already durable, so a failed rewrite is not fatal
            if let Err(e) = compaction::compact(config, &mut log, &state) {
                tracing::warn!("Compaction after commit failed: {}", e);
            }
        }

        Ok(Some(lsn))
    }

    /// Discard all staged changes
    pub fn rollback(self) {
        if !self.operations.is_empty() {
            tracing::debug!("Rolled back {} staged operations", self.operations.len());
        }
    }

    /// Stage a private copy of a bucket for mutation
    fn bucket_mut(&mut self, name: &str) -> Result<&mut Bucket> {
        if !self.staged.contains_key(name) {
            let copy = self
                .base
                .bucket(name)
                .cloned()
                .ok_or_else(|| PearsError::BucketNotFound(name.to_string()))?;
            self.staged.insert(name.to_string(), Some(copy));
        }

        match self.staged.get_mut(name) {
            Some(Some(bucket)) => Ok(bucket),
            _ => Err(PearsError::BucketNotFound(name.to_string())),
        }
    }
}
