//! Bucket Module
//!
//! In-memory contents of one named keyspace.
//!
//! ## Responsibilities
//! - Point reads and writes by key
//! - Ordered iteration (lexicographic by key bytes)
//! - Track approximate size in bytes
//!
//! ## Data Structure Choice
//! BTreeMap gives the sorted key order callers iterate in. Locking lives in
//! the store, not here: a bucket is only reached through a transaction.

mod table;

pub use table::{Bucket, BucketIter};
