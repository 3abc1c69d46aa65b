//! Tests for LogRecovery
//!
//! These tests verify:
//! - Recovery from a clean log and from an empty file
//! - Recovery with partial writes (torn tail)
//! - Recovery with a corrupt final frame
//! - Corruption in the middle of the log is an error
//! - Verify mode (stats only, file untouched)

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use pairing_pears::config::SyncStrategy;
use pairing_pears::log::{
    LogEntry, LogRecovery, LogWriter, Operation, FILE_HEADER_SIZE, HEADER_SIZE,
};
use pairing_pears::PearsError;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_log() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("test.db");
    (temp_dir, path)
}

fn put(i: usize) -> Vec<Operation> {
    vec![Operation::Put {
        bucket: "b".to_string(),
        key: format!("key{}", i).into_bytes(),
        value: format!("value{}", i).into_bytes(),
    }]
}

/// Write `count` frames; returns the file length after each frame
fn write_entries(path: &Path, count: usize) -> Vec<u64> {
    let (mut writer, _, _) = LogWriter::open(path, 0o600, SyncStrategy::EveryWrite).unwrap();
    (0..count)
        .map(|i| {
            writer.append(put(i)).unwrap();
            writer.len()
        })
        .collect()
}

fn open_rw(path: &Path) -> File {
    OpenOptions::new().read(true).write(true).open(path).unwrap()
}

fn append_raw(path: &Path, bytes: &[u8]) {
    let mut file = OpenOptions::new().append(true).open(path).unwrap();
    file.write_all(bytes).unwrap();
    file.sync_all().unwrap();
}

fn flip_byte(path: &Path, offset: u64) {
    let mut bytes = fs::read(path).unwrap();
    bytes[offset as usize] ^= 0xFF;
    fs::write(path, bytes).unwrap();
}

// =============================================================================
// Clean Log Tests
// =============================================================================

#[test]
fn test_recover_empty_file() {
    let (_temp, path) = setup_temp_log();
    File::create(&path).unwrap();

    let (entries, result) = LogRecovery::recover(&mut open_rw(&path)).unwrap();

    assert!(entries.is_empty());
    assert_eq!(result.entries_recovered, 0);
    assert_eq!(result.last_lsn, 0);
    assert_eq!(result.valid_len, 0);
    assert!(!result.was_truncated);
}

#[test]
fn test_recover_header_only() {
    let (_temp, path) = setup_temp_log();
    write_entries(&path, 0);

    let (entries, result) = LogRecovery::recover(&mut open_rw(&path)).unwrap();

    assert!(entries.is_empty());
    assert_eq!(result.valid_len, FILE_HEADER_SIZE);
}

#[test]
fn test_recover_multiple_entries() {
    let (_temp, path) = setup_temp_log();
    let lens = write_entries(&path, 10);

    let (entries, result) = LogRecovery::recover(&mut open_rw(&path)).unwrap();

    assert_eq!(entries.len(), 10);
    assert_eq!(result.entries_recovered, 10);
    assert_eq!(result.entries_corrupted, 0);
    assert_eq!(result.last_lsn, 10);
    assert_eq!(result.valid_len, *lens.last().unwrap());
    assert!(!result.was_truncated);

    for (i, entry) in entries.iter().enumerate() {
        assert_eq!(entry.lsn, (i + 1) as u64);
        assert_eq!(entry.operations, put(i));
    }
}

// =============================================================================
// Torn Tail Tests
// =============================================================================

#[test]
fn test_recover_truncates_partial_frame() {
    let (_temp, path) = setup_temp_log();
    let lens = write_entries(&path, 3);

    // Half of a fourth frame, as if the process died mid-write
    let frame = LogEntry::new(4, put(3)).serialize().unwrap();
    append_raw(&path, &frame[..frame.len() / 2]);

    let (entries, result) = LogRecovery::recover(&mut open_rw(&path)).unwrap();

    assert_eq!(entries.len(), 3);
    assert_eq!(result.entries_corrupted, 1);
    assert!(result.was_truncated);
    assert_eq!(result.valid_len, lens[2]);
    assert_eq!(fs::metadata(&path).unwrap().len(), lens[2]);
}

#[test]
fn test_recover_truncates_partial_header() {
    let (_temp, path) = setup_temp_log();
    let lens = write_entries(&path, 2);

    append_raw(&path, &[1, 2, 3]);

    let (entries, result) = LogRecovery::recover(&mut open_rw(&path)).unwrap();

    assert_eq!(entries.len(), 2);
    assert!(result.was_truncated);
    assert_eq!(fs::metadata(&path).unwrap().len(), lens[1]);
}

#[test]
fn test_recover_truncates_corrupt_last_frame() {
    let (_temp, path) = setup_temp_log();
    let lens = write_entries(&path, 3);

    flip_byte(&path, lens[2] - 1);

    let (entries, result) = LogRecovery::recover(&mut open_rw(&path)).unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(result.last_lsn, 2);
    assert!(result.was_truncated);
    assert_eq!(fs::metadata(&path).unwrap().len(), lens[1]);
}

#[test]
fn test_recover_torn_file_header() {
    let (_temp, path) = setup_temp_log();
    fs::write(&path, b"PP").unwrap();

    let (entries, result) = LogRecovery::recover(&mut open_rw(&path)).unwrap();

    assert!(entries.is_empty());
    assert!(result.was_truncated);
    assert_eq!(result.valid_len, 0);
    assert_eq!(fs::metadata(&path).unwrap().len(), 0);
}

#[test]
fn test_recover_truncates_zero_filled_tail() {
    let (_temp, path) = setup_temp_log();
    let lens = write_entries(&path, 2);

    // Longer than one frame header, as left by preallocation before a crash
    append_raw(&path, &[0u8; 100]);

    let (entries, result) = LogRecovery::recover(&mut open_rw(&path)).unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(result.last_lsn, 2);
    assert!(result.was_truncated);
    assert_eq!(result.valid_len, lens[1]);
    assert_eq!(fs::metadata(&path).unwrap().len(), lens[1]);
}

// =============================================================================
// Hard Corruption Tests
// =============================================================================

#[test]
fn test_corruption_followed_by_data_fails() {
    let (_temp, path) = setup_temp_log();
    let lens = write_entries(&path, 3);

    // First data byte of the second frame
    flip_byte(&path, lens[0] + HEADER_SIZE as u64);

    match LogRecovery::recover(&mut open_rw(&path)) {
        Err(e @ PearsError::Corruption(_)) => {
            let message = e.to_string();
            assert!(message.contains("CRC mismatch at LSN 2"), "{}", message);
            assert_eq!(message.matches("Log corruption detected").count(), 1);
        }
        Err(e) => panic!("expected Corruption, got {}", e),
        Ok(_) => panic!("expected Corruption, got a recovered log"),
    }
}

#[test]
fn test_invalid_magic_fails() {
    let (_temp, path) = setup_temp_log();
    fs::write(&path, b"NOTADATABASEFILE").unwrap();

    let result = LogRecovery::recover(&mut open_rw(&path));
    assert!(matches!(result, Err(PearsError::Corruption(_))));
}

#[test]
fn test_short_garbage_fails() {
    let (_temp, path) = setup_temp_log();
    fs::write(&path, b"xyz").unwrap();

    let result = LogRecovery::recover(&mut open_rw(&path));
    assert!(matches!(result, Err(PearsError::Corruption(_))));
}

// =============================================================================
// Verify Tests
// =============================================================================

#[test]
fn test_verify_does_not_modify_file() {
    let (_temp, path) = setup_temp_log();
    write_entries(&path, 2);
    append_raw(&path, &[0xAA; 5]);
    let len_before = fs::metadata(&path).unwrap().len();

    let result = LogRecovery::verify(&path).unwrap();

    assert_eq!(result.entries_recovered, 2);
    assert!(result.was_truncated);
    assert_eq!(fs::metadata(&path).unwrap().len(), len_before);
}
