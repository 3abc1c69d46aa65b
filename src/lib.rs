//! # Pairing Pears
//!
//! Local persistence for the Pairing Pears desktop app: developers and
//! groups stored in one embedded, transactional, single-file database.
//!
//! - Append-only commit log with CRC32-checked frames
//! - Crash recovery that drops a torn tail
//! - Named buckets with read and read-write transactions
//! - Exclusive file lock: one process per database file
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 App (startup / shutdown)                     │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │              Database (developers, groups)                   │
//! │          Record codec: JSON values, UUID v4 keys             │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ one transaction per call
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                         Store                                │
//! │            (Single Writer / Multi Reader)                    │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │ Commit Log  │          │   Buckets   │
//!   │  (Append)   │          │  (BTreeMap) │
//!   └─────────────┘          └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;

pub mod app;
pub mod assign;
pub mod bucket;
pub mod db;
pub mod log;
pub mod record;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use app::App;
pub use config::{Config, SyncStrategy};
pub use db::Database;
pub use error::{PearsError, Result};
pub use record::{Developer, Group, Record};
pub use store::Store;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of Pairing Pears
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
