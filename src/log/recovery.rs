//! Log Recovery
//!
//! Rebuilds the list of committed transactions when the file is opened.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::{PearsError, Result};

use super::{Frame, LogEntry, LogReader, FILE_HEADER_SIZE, FILE_MAGIC, FILE_VERSION};

/// Handles log recovery on open
pub struct LogRecovery;

/// Result of a recovery operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecoveryResult {
    /// Number of frames successfully recovered
    pub entries_recovered: u64,

    /// Number of trailing frames discarded as torn or corrupt
    pub entries_corrupted: u64,

    /// Last valid LSN (0 when the log is empty)
    pub last_lsn: u64,

    /// Whether a partial tail was (or would be) cut off
    pub was_truncated: bool,

    /// Length of the file up to the end of the last valid frame.
    /// Zero means the file holds no header yet.
    pub valid_len: u64,
}

impl LogRecovery {
    /// Recover entries from an open, locked database file
    ///
    /// This will:
    /// 1. Validate the file header
    /// 2. Read all valid frames in order
    /// 3. Truncate a torn or corrupt tail
    /// 4. Fail if corruption is followed by more data
    pub fn recover(file: &mut File) -> Result<(Vec<LogEntry>, RecoveryResult)> {
        let (entries, result) = Self::scan(file)?;

        if result.was_truncated {
            tracing::warn!(
                "Discarding {} torn frame(s) after LSN {}, truncating to {} bytes",
                result.entries_corrupted,
                result.last_lsn,
                result.valid_len
            );
            file.set_len(result.valid_len)?;
            file.sync_all()?;
        }

        Ok((entries, result))
    }

    /// Verify integrity of a database file without modifying it
    pub fn verify(path: &Path) -> Result<RecoveryResult> {
        let mut file = File::open(path)?;
        let (_, result) = Self::scan(&mut file)?;
        Ok(result)
    }

    fn scan(file: &mut File) -> Result<(Vec<LogEntry>, RecoveryResult)> {
        let mut bytes = Vec::new();
        file.seek(SeekFrom::Start(0))?;
        file.read_to_end(&mut bytes)?;

        let mut result = RecoveryResult::default();
        let header_len = FILE_HEADER_SIZE as usize;

        // Brand-new file, or a crash while the header itself was written
        if bytes.len() < header_len {
            if FILE_MAGIC.starts_with(&bytes[..bytes.len().min(FILE_MAGIC.len())]) {
                result.was_truncated = !bytes.is_empty();
                return Ok((Vec::new(), result));
            }
            return Err(PearsError::Corruption(
                "File is not a Pairing Pears database".to_string(),
            ));
        }

        if &bytes[0..4] != FILE_MAGIC {
            return Err(PearsError::Corruption(format!(
                "Invalid file magic: expected PPDB, got {:?}",
                &bytes[0..4]
            )));
        }
        let version = u16::from_le_bytes([bytes[4], bytes[5]]);
        if version != FILE_VERSION {
            return Err(PearsError::Corruption(format!(
                "Unsupported file version: {}",
                version
            )));
        }

        let mut entries = Vec::new();
        let mut reader = LogReader::new(&bytes[header_len..]);

        while let Some(frame) = reader.next_frame() {
            match frame {
                Frame::Entry(entry) => {
                    if entry.lsn <= result.last_lsn {
                        return Err(PearsError::Corruption(format!(
                            "LSN went backwards: {} after {}",
                            entry.lsn, result.last_lsn
                        )));
                    }
                    result.last_lsn = entry.lsn;
                    result.entries_recovered += 1;
                    entries.push(entry);
                }
                Frame::Incomplete => {
                    result.entries_corrupted += 1;
                    result.was_truncated = true;
                    break;
                }
                Frame::Corrupt { reason, frame_len } => {
                    if frame_len < reader.remaining() {
                        return Err(PearsError::Corruption(reason));
                    }
                    tracing::debug!("Corrupt tail frame: {}", reason);
                    result.entries_corrupted += 1;
                    result.was_truncated = true;
                    break;
                }
            }
        }

        result.valid_len = FILE_HEADER_SIZE + reader.position() as u64;
        Ok((entries, result))
    }
}
