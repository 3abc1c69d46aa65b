//! Log Reader
//!
//! Walks commit frames in a byte buffer holding the log body.

use crate::error::PearsError;

use super::entry::{parse_header, LogEntry, HEADER_SIZE};

/// Outcome of reading one frame
#[derive(Debug)]
pub enum Frame {
    /// A complete, checksummed entry
    Entry(LogEntry),

    /// The buffer ends inside this frame, or only unwritten space follows
    Incomplete,

    /// The frame is complete but fails verification
    Corrupt {
        reason: String,
        /// Header + data length of the bad frame
        frame_len: usize,
    },
}

/// Sequential reader over frames
pub struct LogReader<'a> {
    buf: &'a [u8],
    position: usize,
}

impl<'a> LogReader<'a> {
    /// Read frames from `buf`, which starts right after the file header
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, position: 0 }
    }

    /// Read the next frame. Returns `None` at a clean end of buffer.
    ///
    /// Only a complete entry advances the position.
    pub fn next_frame(&mut self) -> Option<Frame> {
        let remaining = &self.buf[self.position..];
        if remaining.is_empty() {
            return None;
        }
        if remaining.len() < HEADER_SIZE {
            return Some(Frame::Incomplete);
        }

        let (lsn, crc, len) = parse_header(remaining);

        // No committed frame has LSN 0 or an empty body: this is unwritten
        // space (e.g. zero fill) past the last real frame
        if lsn == 0 || len == 0 {
            return Some(Frame::Incomplete);
        }

        let frame_len = HEADER_SIZE + len;
        if remaining.len() < frame_len {
            return Some(Frame::Incomplete);
        }

        match LogEntry::decode_data(lsn, crc, &remaining[HEADER_SIZE..frame_len]) {
            Ok(entry) => {
                self.position += frame_len;
                Some(Frame::Entry(entry))
            }
            Err(PearsError::Corruption(reason)) => Some(Frame::Corrupt { reason, frame_len }),
            Err(e) => Some(Frame::Corrupt {
                reason: e.to_string(),
                frame_len,
            }),
        }
    }

    /// Offset of the first unread byte
    pub fn position(&self) -> usize {
        self.position
    }

    /// Bytes left after the current position
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.position
    }
}
