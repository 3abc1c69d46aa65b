//! Tests for Bucket
//!
//! These tests verify:
//! - Basic put/get/delete
//! - Size accounting across overwrites and deletes
//! - Sorted iteration

use pairing_pears::bucket::Bucket;

#[test]
fn test_new_bucket_is_empty() {
    let bucket = Bucket::new();

    assert!(bucket.is_empty());
    assert_eq!(bucket.len(), 0);
    assert_eq!(bucket.size(), 0);
    assert_eq!(bucket.iter().count(), 0);
}

#[test]
fn test_put_get() {
    let mut bucket = Bucket::new();

    assert_eq!(bucket.put(b"key".to_vec(), b"value".to_vec()), None);

    assert_eq!(bucket.get(b"key"), Some(&b"value"[..]));
    assert!(bucket.contains_key(b"key"));
    assert_eq!(bucket.get(b"other"), None);
}

#[test]
fn test_put_overwrite_returns_previous() {
    let mut bucket = Bucket::new();
    bucket.put(b"key".to_vec(), b"v1".to_vec());

    let previous = bucket.put(b"key".to_vec(), b"value2".to_vec());

    assert_eq!(previous, Some(b"v1".to_vec()));
    assert_eq!(bucket.len(), 1);
    assert_eq!(bucket.size(), 3 + 6);
}

#[test]
fn test_delete() {
    let mut bucket = Bucket::new();
    bucket.put(b"a".to_vec(), b"1".to_vec());
    bucket.put(b"b".to_vec(), b"22".to_vec());

    assert!(bucket.delete(b"a"));
    assert!(!bucket.delete(b"a"));

    assert_eq!(bucket.len(), 1);
    assert_eq!(bucket.size(), 3);
}

#[test]
fn test_iteration_is_sorted() {
    let mut bucket = Bucket::new();
    for key in ["pear", "apple", "fig", "banana"] {
        bucket.put(key.as_bytes().to_vec(), vec![]);
    }

    let keys: Vec<&[u8]> = bucket.iter().map(|(k, _)| k).collect();

    assert_eq!(
        keys,
        vec![
            b"apple".as_slice(),
            b"banana".as_slice(),
            b"fig".as_slice(),
            b"pear".as_slice()
        ]
    );
}
