//! Error types for Pairing Pears
//!
//! Provides a unified error type for store, codec and data access operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using PearsError
pub type Result<T> = std::result::Result<T, PearsError>;

/// Unified error type for Pairing Pears operations
#[derive(Debug, Error)]
pub enum PearsError {
    // -------------------------------------------------------------------------
    // Availability Errors (fatal at startup)
    // -------------------------------------------------------------------------
    #[error("Storage unavailable at {}: {source}", .path.display())]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Database file is locked by another process: {}", .0.display())]
    Locked(PathBuf),

    #[error("Database is not initialized")]
    NotInitialized,

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Storage Errors
    // -------------------------------------------------------------------------
    #[error("Log corruption detected: {0}")]
    Corruption(String),

    #[error("Bucket not found: {0}")]
    BucketNotFound(String),

    #[error("Bucket already exists: {0}")]
    BucketExists(String),

    #[error("Storage error: {0}")]
    Storage(String),

    // -------------------------------------------------------------------------
    // Record Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
}

impl PearsError {
    /// True for logical "record does not exist" failures
    pub fn is_not_found(&self) -> bool {
        matches!(self, PearsError::NotFound { .. })
    }

    /// True when no usable store is behind the caller
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            PearsError::StorageUnavailable { .. } | PearsError::Locked(_) | PearsError::NotInitialized
        )
    }
}
