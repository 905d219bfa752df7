//! Keeper Backup System
//!
//! This crate archives the data directories of a managed service into a
//! single gzip-compressed tar file and restores them without ever replacing
//! a file that already exists.
//!
//! # Features
//!
//! ## Backup
//! - **Dereferenced symlinks**: archives hold file content, never links
//! - **Relocatable entries**: names are stored without the leading `/`
//! - **Missing directories**: skipped and reported instead of failing
//!
//! ## Restore
//! - **Directory filtering**: only entries under the configured directories
//! - **All-or-nothing**: every target is checked before the first write
//! - **Safe extraction**: absolute and `..` entries are refused
//!
//! Progress is reported through a [`BackupObserver`]; see [`service`] for an
//! end-to-end example.

pub mod archive;
pub mod error;
pub mod filters;
pub mod naming;
pub mod observer;
pub mod progress;
pub mod reader;
pub mod restore;
pub mod service;

// Re-export commonly used types
pub use archive::{ArchiveWriter, BackupOptions, BackupResult, DEFAULT_COMPRESSION_LEVEL};
pub use error::{Error, Result};
pub use filters::RestoreFilter;
pub use naming::{backup_filename, ARCHIVE_EXTENSION, PARTIAL_MARKER};
pub use observer::{BackupObserver, NoOpObserver, Phase, TracingObserver};
pub use progress::ProgressObserver;
pub use reader::{ArchiveEntry, ArchiveReader, EntryKind};
pub use restore::{OverwriteGuard, RestoreResult, Restorer, DEFAULT_RESTORE_ROOT};
pub use service::{check_preconditions, BackupRestoreService};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
