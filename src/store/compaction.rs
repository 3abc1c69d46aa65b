//! Log compaction
//!
//! Rewrites the live bucket state as a fresh single-frame log and swaps it
//! in for the current file. Callers hold the writer lock and a read lock on
//! the state for the whole pass.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::Result;
use crate::log::{open_locked, LogWriter, Operation};

use super::state::State;

/// Suffix of the temporary file written during compaction
const COMPACT_SUFFIX: &str = "compact";

/// Outcome of a compaction pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompactionStats {
    /// File length before compaction
    pub bytes_before: u64,

    /// File length after compaction
    pub bytes_after: u64,

    /// Live keys carried over
    pub keys: usize,
}

/// True once the log holds enough frames to be worth rewriting
pub(crate) fn is_due(config: &Config, log: &LogWriter) -> bool {
    config.compact_threshold > 0 && log.frame_count() >= config.compact_threshold
}

/// Rewrite `state` into a new file and replace `log` with a writer on it
///
/// The new file is locked before it is renamed over the old one, so no
/// other process can open the path in between.
pub(crate) fn compact(
    config: &Config,
    log: &mut LogWriter,
    state: &State,
) -> Result<CompactionStats> {
    let bytes_before = log.len();
    let keys = state.key_count();

    let path = config.db_path.clone();
    let tmp_path = compaction_path(&path);

    let operations = state.snapshot_operations();
    let mut writer = match write_snapshot(config, &tmp_path, &path, operations) {
        Ok(writer) => writer,
        Err(e) => {
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }
    };
    writer.set_path(path);

    let bytes_after = writer.len();
    *log = writer;

    // The rename is done and the new writer installed; a failed directory
    // sync only risks the rename itself after a power loss
    if let Err(e) = sync_parent_dir(&config.db_path) {
        tracing::warn!(
            "Failed to sync directory of {}: {}",
            config.db_path.display(),
            e
        );
    }

    tracing::info!(
        "Compacted {}: {} -> {} bytes, {} keys",
        config.db_path.display(),
        bytes_before,
        bytes_after,
        keys
    );

    Ok(CompactionStats {
        bytes_before,
        bytes_after,
        keys,
    })
}

/// `<db_path>.compact`, next to the database file
fn compaction_path(db_path: &Path) -> PathBuf {
    let mut name = db_path.as_os_str().to_owned();
    name.push(".");
    name.push(COMPACT_SUFFIX);
    PathBuf::from(name)
}

/// Write `operations` as a fresh log at `tmp_path`, then rename it to `path`
fn write_snapshot(
    config: &Config,
    tmp_path: &Path,
    path: &Path,
    operations: Vec<Operation>,
) -> Result<LogWriter> {
    let file = open_locked(tmp_path, config.file_mode)?;
    let mut writer = LogWriter::create(file, tmp_path, config.sync_strategy)?;
    if !operations.is_empty() {
        writer.append(operations)?;
    }
    writer.sync()?;
    fs::rename(tmp_path, path)?;
    Ok(writer)
}

/// Persist the directory entry created by the rename
#[cfg(unix)]
fn sync_parent_dir(path: &Path) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::File::open(dir)?.sync_all()?;
    Ok(())
}

#[cfg(not(unix))]
fn sync_parent_dir(_path: &Path) -> Result<()> {
    Ok(())
}
