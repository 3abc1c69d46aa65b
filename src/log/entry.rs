//! Log Entry definitions
//!
//! Defines the structure of a commit frame and its operations.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::{PearsError, Result};

/// Frame header size: LSN (8) + CRC (4) + Len (4) = 16 bytes
pub const HEADER_SIZE: usize = 16;

/// One committed write transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Log Sequence Number - strictly increasing
    pub lsn: u64,

    /// Operations of the transaction, in the order they were issued
    pub operations: Vec<Operation>,

    /// Timestamp (unix millis) when the transaction committed
    pub timestamp: u64,
}

/// Bucket-level operations that can be logged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    /// Create an empty bucket
    CreateBucket { bucket: String },

    /// Drop a bucket and every key in it
    DeleteBucket { bucket: String },

    /// Put a key-value pair into a bucket
    Put {
        bucket: String,
        key: Vec<u8>,
        value: Vec<u8>,
    },

    /// Delete a key from a bucket
    Delete { bucket: String, key: Vec<u8> },
}

impl Operation {
    /// Name of the bucket this operation touches
    pub fn bucket(&self) -> &str {
        match self {
            Operation::CreateBucket { bucket }
            | Operation::DeleteBucket { bucket }
            | Operation::Put { bucket, .. }
            | Operation::Delete { bucket, .. } => bucket,
        }
    }
}

impl LogEntry {
    /// Create an entry stamped with the current time
    pub fn new(lsn: u64, operations: Vec<Operation>) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        Self {
            lsn,
            operations,
            timestamp,
        }
    }

    /// Encode as a full frame: header followed by data
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let data = self.encode_data()?;
        let len = u32::try_from(data.len()).map_err(|_| {
            PearsError::Storage(format!("Commit of {} bytes exceeds frame limit", data.len()))
        })?;
        let crc = crc32fast::hash(&data);

        let mut frame = Vec::with_capacity(HEADER_SIZE + data.len());
        frame.extend_from_slice(&self.lsn.to_le_bytes());
        frame.extend_from_slice(&crc.to_le_bytes());
        frame.extend_from_slice(&len.to_le_bytes());
        frame.extend_from_slice(&data);

        Ok(frame)
    }

    /// Decode exactly one frame, verifying length, CRC and LSN
    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(PearsError::Corruption(format!(
                "Incomplete frame header: expected {} bytes, got {}",
                HEADER_SIZE,
                bytes.len()
            )));
        }

        let (lsn, crc, len) = parse_header(bytes);
        let data = bytes.get(HEADER_SIZE..HEADER_SIZE + len).ok_or_else(|| {
            PearsError::Corruption(format!(
                "Incomplete frame data: expected {} bytes, got {}",
                len,
                bytes.len() - HEADER_SIZE
            ))
        })?;

        Self::decode_data(lsn, crc, data)
    }

    /// CRC32 of the encoded data section
    pub fn compute_crc(&self) -> Result<u32> {
        Ok(crc32fast::hash(&self.encode_data()?))
    }

    /// Size of the full frame in bytes
    pub fn serialized_size(&self) -> Result<usize> {
        let data_len = bincode::serialized_size(self)
            .map_err(|e| PearsError::Storage(format!("Failed to size log entry: {}", e)))?;
        Ok(HEADER_SIZE + data_len as usize)
    }

    fn encode_data(&self) -> Result<Vec<u8>> {
        bincode::serialize(self)
            .map_err(|e| PearsError::Storage(format!("Failed to encode log entry: {}", e)))
    }

    /// Verify and decode a frame's data section
    pub(crate) fn decode_data(lsn: u64, crc: u32, data: &[u8]) -> Result<Self> {
        let actual = crc32fast::hash(data);
        if actual != crc {
            return Err(PearsError::Corruption(format!(
                "CRC mismatch at LSN {}: stored {:08x}, computed {:08x}",
                lsn, crc, actual
            )));
        }

        let entry: LogEntry = bincode::deserialize(data)
            .map_err(|e| PearsError::Corruption(format!("Undecodable frame at LSN {}: {}", lsn, e)))?;

        if entry.lsn != lsn {
            return Err(PearsError::Corruption(format!(
                "Frame header LSN {} does not match entry LSN {}",
                lsn, entry.lsn
            )));
        }

        Ok(entry)
    }
}

/// Split a frame header into (lsn, crc, data length)
pub(crate) fn parse_header(bytes: &[u8]) -> (u64, u32, usize) {
    let mut lsn = [0u8; 8];
    let mut crc = [0u8; 4];
    let mut len = [0u8; 4];
    lsn.copy_from_slice(&bytes[0..8]);
    crc.copy_from_slice(&bytes[8..12]);
    len.copy_from_slice(&bytes[12..16]);

    (
        u64::from_le_bytes(lsn),
        u32::from_le_bytes(crc),
        u32::from_le_bytes(len) as usize,
    )
}
