//! Bucket state rebuilt from the commit log

use std::collections::BTreeMap;

use crate::bucket::Bucket;
use crate::error::{PearsError, Result};
use crate::log::Operation;

/// All buckets, keyed by name
#[derive(Debug, Default)]
pub(crate) struct State {
    buckets: BTreeMap<String, Bucket>,
}

impl State {
    pub fn bucket(&self, name: &str) -> Option<&Bucket> {
        self.buckets.get(name)
    }

    pub fn bucket_names(&self) -> Vec<String> {
        self.buckets.keys().cloned().collect()
    }

    /// Apply a replayed operation. Operations that a live transaction
    /// would have rejected mean the log is inconsistent.
    pub fn apply(&mut self, operation: Operation) -> Result<()> {
        match operation {
            Operation::CreateBucket { bucket } => {
                if self.buckets.contains_key(&bucket) {
                    return Err(PearsError::Corruption(format!(
                        "Replayed creation of existing bucket {}",
                        bucket
                    )));
                }
                self.buckets.insert(bucket, Bucket::new());
            }
            Operation::DeleteBucket { bucket } => {
                if self.buckets.remove(&bucket).is_none() {
                    return Err(PearsError::Corruption(format!(
                        "Replayed deletion of missing bucket {}",
                        bucket
                    )));
                }
            }
            Operation::Put { bucket, key, value } => {
                self.replay_target(&bucket)?.put(key, value);
            }
            Operation::Delete { bucket, key } => {
                self.replay_target(&bucket)?.delete(&key);
            }
        }
        Ok(())
    }

    /// Install the buckets staged by a committed write transaction.
    /// `None` removes the bucket.
    pub fn install(&mut self, staged: BTreeMap<String, Option<Bucket>>) {
        for (name, bucket) in staged {
            match bucket {
                Some(bucket) => {
                    self.buckets.insert(name, bucket);
                }
                None => {
                    self.buckets.remove(&name);
                }
            }
        }
    }

    /// Operations that recreate the current state from an empty log
    pub fn snapshot_operations(&self) -> Vec<Operation> {
        let mut operations = Vec::new();
        for (name, bucket) in &self.buckets {
            operations.push(Operation::CreateBucket {
                bucket: name.clone(),
            });
            for (key, value) in bucket {
                operations.push(Operation::Put {
                    bucket: name.clone(),
                    key: key.to_vec(),
                    value: value.to_vec(),
                });
            }
        }
        operations
    }

    /// Total number of keys across buckets
    pub fn key_count(&self) -> usize {
        self.buckets.values().map(Bucket::len).sum()
    }

    fn replay_target(&mut self, bucket: &str) -> Result<&mut Bucket> {
        self.buckets.get_mut(bucket).ok_or_else(|| {
            PearsError::Corruption(format!("Replayed write to missing bucket {}", bucket))
        })
    }
}
