//! Tests for LogReader
//!
//! These tests verify:
//! - Sequential reading of complete frames
//! - Torn frames are reported as incomplete
//! - Checksum failures are reported with the frame length

use pairing_pears::log::{Frame, LogEntry, LogReader, Operation, HEADER_SIZE};

fn frame(lsn: u64) -> Vec<u8> {
    LogEntry::new(
        lsn,
        vec![Operation::Put {
            bucket: "b".to_string(),
            key: format!("key{}", lsn).into_bytes(),
            value: b"value".to_vec(),
        }],
    )
    .serialize()
    .unwrap()
}

#[test]
fn test_empty_buffer() {
    let mut reader = LogReader::new(&[]);

    assert!(reader.next_frame().is_none());
    assert_eq!(reader.position(), 0);
}

#[test]
fn test_reads_frames_in_order() {
    let mut buf = Vec::new();
    for lsn in 1..=3 {
        buf.extend_from_slice(&frame(lsn));
    }
    let mut reader = LogReader::new(&buf);

    let mut lsns = Vec::new();
    while let Some(Frame::Entry(entry)) = reader.next_frame() {
        lsns.push(entry.lsn);
    }

    assert_eq!(lsns, vec![1, 2, 3]);
    assert_eq!(reader.position(), buf.len());
    assert_eq!(reader.remaining(), 0);
}

#[test]
fn test_partial_header_is_incomplete() {
    let mut buf = frame(1);
    let first_len = buf.len();
    buf.extend_from_slice(&frame(2)[..HEADER_SIZE - 1]);
    let mut reader = LogReader::new(&buf);

    assert!(matches!(reader.next_frame(), Some(Frame::Entry(_))));
    assert!(matches!(reader.next_frame(), Some(Frame::Incomplete)));
    assert_eq!(reader.position(), first_len);
}

#[test]
fn test_partial_data_is_incomplete() {
    let full = frame(1);
    let mut reader = LogReader::new(&full[..full.len() - 1]);

    assert!(matches!(reader.next_frame(), Some(Frame::Incomplete)));
    assert_eq!(reader.position(), 0);
}

#[test]
fn test_bad_checksum_is_corrupt() {
    let mut buf = frame(1);
    let len = buf.len();
    buf[len - 1] ^= 0xFF;
    let mut reader = LogReader::new(&buf);

    match reader.next_frame() {
        Some(Frame::Corrupt { frame_len, reason }) => {
            assert_eq!(frame_len, len);
            assert!(reason.contains("CRC"));
        }
        other => panic!("expected corrupt frame, got {:?}", other),
    }
    assert_eq!(reader.position(), 0);
    assert_eq!(reader.remaining(), len);
}

#[test]
fn test_zero_filled_header_is_incomplete() {
    let mut buf = frame(1);
    let first_len = buf.len();
    buf.extend_from_slice(&[0u8; 64]);
    let mut reader = LogReader::new(&buf);

    assert!(matches!(reader.next_frame(), Some(Frame::Entry(_))));
    assert!(matches!(reader.next_frame(), Some(Frame::Incomplete)));
    assert_eq!(reader.position(), first_len);
}

#[test]
fn test_corrupt_reason_is_not_double_wrapped() {
    let mut buf = frame(1);
    let len = buf.len();
    buf[len - 1] ^= 0xFF;

    match LogReader::new(&buf).next_frame() {
        Some(Frame::Corrupt { reason, .. }) => {
            assert!(reason.starts_with("CRC mismatch"), "{}", reason);
        }
        other => panic!("expected corrupt frame, got {:?}", other),
    }
}
