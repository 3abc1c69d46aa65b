//! Bucket implementation
//!
//! BTreeMap-based keyspace with size accounting.

use std::collections::btree_map;
use std::collections::BTreeMap;

/// An ordered key-value keyspace
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bucket {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,

    /// Sum of key and value lengths
    size: usize,
}

impl Bucket {
    /// Create a new empty bucket
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a value by key
    pub fn get(&self, key: &[u8]) -> Option<&[u8]> {
        self.entries.get(key).map(|v| v.as_slice())
    }

    /// Check whether a key is present
    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.entries.contains_key(key)
    }

    /// Put a key-value pair, returning the previous value
    pub fn put(&mut self, key: Vec<u8>, value: Vec<u8>) -> Option<Vec<u8>> {
        let key_len = key.len();
        let value_len = value.len();

        let previous = self.entries.insert(key, value);
        match &previous {
            Some(old) => self.size = self.size - old.len() + value_len,
            None => self.size += key_len + value_len,
        }

        previous
    }

    /// Delete a key. Returns whether it was present.
    pub fn delete(&mut self, key: &[u8]) -> bool {
        match self.entries.remove(key) {
            Some(old) => {
                self.size -= key.len() + old.len();
                true
            }
            None => false,
        }
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the bucket has no keys
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Approximate size in bytes (keys + values)
    pub fn size(&self) -> usize {
        self.size
    }

    /// Iterate over entries in sorted key order
    pub fn iter(&self) -> BucketIter<'_> {
        BucketIter {
            inner: self.entries.iter(),
        }
    }
}

/// Iterator over bucket entries in key order
pub struct BucketIter<'a> {
    inner: btree_map::Iter<'a, Vec<u8>, Vec<u8>>,
}

impl<'a> Iterator for BucketIter<'a> {
    type Item = (&'a [u8], &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(k, v)| (k.as_slice(), v.as_slice()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a> IntoIterator for &'a Bucket {
    type Item = (&'a [u8], &'a [u8]);
    type IntoIter = BucketIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
