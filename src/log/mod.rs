//! Commit Log Module
//!
//! The single database file is an append-only log of committed write
//! transactions. The in-memory bucket state is rebuilt from it on open.
//!
//! ## Responsibilities
//! - Append one frame per committed transaction
//! - CRC32 checksums for corruption detection
//! - Log Sequence Numbers (LSN) for ordering
//! - Crash recovery: replay valid frames, drop a torn tail
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────┐
//! │ File Header (8)                         │
//! │ ┌──────────┬───────────┬──────────────┐ │
//! │ │Magic (4) │Version (2)│Reserved (2)  │ │
//! │ └──────────┴───────────┴──────────────┘ │
//! ├─────────────────────────────────────────┤
//! │ Frame 1                                 │
//! │ ┌─────────┬─────────┬────────┬────────┐ │
//! │ │ LSN (8) │ CRC (4) │Len (4) │ Data   │ │
//! │ └─────────┴─────────┴────────┴────────┘ │
//! ├─────────────────────────────────────────┤
//! │ Frame 2 ...                             │
//! └─────────────────────────────────────────┘
//! ```
//!
//! `Data` is the bincode encoding of a [`LogEntry`]; the CRC covers `Data`.

mod entry;
mod reader;
mod recovery;
mod writer;

pub use entry::{LogEntry, Operation, HEADER_SIZE};
pub use reader::{Frame, LogReader};
pub use recovery::{LogRecovery, RecoveryResult};
pub use writer::LogWriter;

pub(crate) use writer::open_locked;

/// Magic bytes identifying a Pairing Pears database file
pub const FILE_MAGIC: &[u8; 4] = b"PPDB";

/// Current file format version
pub const FILE_VERSION: u16 = 1;

/// File header size: Magic (4) + Version (2) + Reserved (2) = 8 bytes
pub const FILE_HEADER_SIZE: u64 = 8;

/// Encode the fixed file header
pub(crate) fn file_header() -> [u8; FILE_HEADER_SIZE as usize] {
    let mut header = [0u8; FILE_HEADER_SIZE as usize];
    header[0..4].copy_from_slice(FILE_MAGIC);
    header[4..6].copy_from_slice(&FILE_VERSION.to_le_bytes());
    header
}
