//! Log Writer
//!
//! Appends commit frames to the locked database file.

use std::fs::{File, OpenOptions, TryLockError};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::config::SyncStrategy;
use crate::error::{PearsError, Result};

use super::{file_header, LogEntry, LogRecovery, Operation, RecoveryResult, FILE_HEADER_SIZE};

/// Writes frames to the end of the database file
pub struct LogWriter {
    /// Exclusively locked file handle; the lock is released on drop
    file: File,

    /// Path the file was opened at
    path: PathBuf,

    /// LSN assigned to the next appended frame
    next_lsn: u64,

    /// Length of the file up to the end of the last frame
    len: u64,

    sync_strategy: SyncStrategy,

    /// Frames appended since the last fsync
    unsynced: usize,

    /// Frames in the file, replayed or appended
    frames: u64,
}

impl LogWriter {
    /// Open or create a database file, lock it and recover its frames
    pub fn open(
        path: &Path,
        file_mode: u32,
        sync_strategy: SyncStrategy,
    ) -> Result<(Self, Vec<LogEntry>, RecoveryResult)> {
        let mut file = open_locked(path, file_mode)?;
        let (entries, recovery) = LogRecovery::recover(&mut file)?;

        let mut writer = Self {
            file,
            path: path.to_path_buf(),
            next_lsn: recovery.last_lsn + 1,
            len: recovery.valid_len,
            sync_strategy,
            unsynced: 0,
            frames: recovery.entries_recovered,
        };

        if writer.len == 0 {
            writer.write_header()?;
        }

        Ok((writer, entries, recovery))
    }

    /// Start a fresh log in an already locked file, discarding its contents
    pub fn create(file: File, path: &Path, sync_strategy: SyncStrategy) -> Result<Self> {
        file.set_len(0)?;

        let mut writer = Self {
            file,
            path: path.to_path_buf(),
            next_lsn: 1,
            len: 0,
            sync_strategy,
            unsynced: 0,
            frames: 0,
        };
        writer.write_header()?;

        Ok(writer)
    }

    /// Append one frame holding `operations`, returning its LSN
    ///
    /// On a failed write or sync the file is cut back to its previous
    /// length so the frame never becomes visible on replay.
    pub fn append(&mut self, operations: Vec<Operation>) -> Result<u64> {
        let lsn = self.next_lsn;
        let frame = LogEntry::new(lsn, operations).serialize()?;

        if let Err(e) = self.write_frame(&frame) {
            if let Err(rollback) = self.file.set_len(self.len) {
                tracing::error!("Failed to roll back partial frame at LSN {}: {}", lsn, rollback);
            }
            return Err(e);
        }

        self.len += frame.len() as u64;
        self.next_lsn += 1;
        self.frames += 1;

        tracing::trace!("Appended LSN {} ({} bytes)", lsn, frame.len());
        Ok(lsn)
    }

    /// Force sync to disk
    pub fn sync(&mut self) -> Result<()> {
        self.file.sync_data()?;
        self.unsynced = 0;
        Ok(())
    }

    /// Get the LSN the next frame will receive
    pub fn current_lsn(&self) -> u64 {
        self.next_lsn
    }

    /// Number of frames in the file
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Length of the log file in bytes
    pub fn len(&self) -> u64 {
        self.len
    }

    /// True when the log holds no frames
    pub fn is_empty(&self) -> bool {
        self.len <= FILE_HEADER_SIZE
    }

    /// Path of the underlying file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record that the file now lives at `path` (after a rename)
    pub(crate) fn set_path(&mut self, path: PathBuf) {
        self.path = path;
    }

    fn write_frame(&mut self, frame: &[u8]) -> Result<()> {
        self.file.seek(SeekFrom::Start(self.len))?;
        self.file.write_all(frame)?;

        self.unsynced += 1;
        match self.sync_strategy {
            SyncStrategy::EveryWrite => self.sync()?,
            SyncStrategy::EveryNEntries { count } => {
                if self.unsynced >= count {
                    self.sync()?;
                }
            }
        }

        Ok(())
    }

    fn write_header(&mut self) -> Result<()> {
        self.file.seek(SeekFrom::Start(0))?;
        self.file.write_all(&file_header())?;
        self.file.sync_all()?;
        self.len = FILE_HEADER_SIZE;
        Ok(())
    }
}

/// Open (creating if absent) `path` and take an exclusive OS lock on it
pub(crate) fn open_locked(path: &Path, file_mode: u32) -> Result<File> {
    let unavailable = |source| PearsError::StorageUnavailable {
        path: path.to_path_buf(),
        source,
    };

    let mut options = OpenOptions::new();
    options.read(true).write(true).create(true).truncate(false);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(file_mode);
    }
    #[cfg(not(unix))]
    let _ = file_mode;

    let file = options.open(path).map_err(unavailable)?;

    match file.try_lock() {
        Ok(()) => Ok(file),
        Err(TryLockError::WouldBlock) => Err(PearsError::Locked(path.to_path_buf())),
        Err(TryLockError::Error(source)) => Err(unavailable(source)),
    }
}
