//! Restore system
//!
//! A restore runs in three stages:
//!
//! 1. list the archive and select the entries under the configured directories
//! 2. check every selected target against the filesystem
//! 3. extract the selection
//!
//! Stage 2 completes before stage 3 begins, so a conflict leaves the
//! filesystem untouched.

use crate::error::Result;
use crate::filters::RestoreFilter;
use crate::observer::{BackupObserver, Phase};
use crate::reader::ArchiveReader;
use keeper_core::DirectorySet;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::info;

pub mod guard;
pub mod validation;

pub use guard::OverwriteGuard;
pub use validation::validate_entry_path;

/// Default restore root
pub const DEFAULT_RESTORE_ROOT: &str = "/";

#[derive(Debug, Clone)]
pub struct RestoreResult {
    /// Number of files written
    pub restored: usize,
    /// Archive entries outside the configured directories
    pub skipped: usize,
    pub duration: Duration,
}

/// Restores files from an archive under a root directory.
pub struct Restorer<'a> {
    directories: &'a DirectorySet,
    root: PathBuf,
    observer: &'a dyn BackupObserver,
}

impl<'a> Restorer<'a> {
    pub fn new(directories: &'a DirectorySet, observer: &'a dyn BackupObserver) -> Self {
        Self {
            directories,
            root: PathBuf::from(DEFAULT_RESTORE_ROOT),
            observer,
        }
    }

    /// Restores under `root` instead of `/`.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    pub fn restore(&self, archive_path: &Path) -> Result<RestoreResult> {
        let start = Instant::now();

        self.observer.on_phase(Phase::Loading);
        let reader = ArchiveReader::open(archive_path)?;
        let entries = reader.entries()?;

        let candidates = RestoreFilter::new(self.directories).select(&entries);
        info!(
            "{} of {} archive entries match {}",
            candidates.len(),
            entries.len(),
            self.directories
        );

        self.observer.on_phase(Phase::Checking);
        OverwriteGuard::new(&self.root).check(&candidates)?;

        self.observer.on_files_counted(candidates.len() as u64);
        self.observer.on_phase(Phase::Extracting);
        let restored = reader.extract(&self.root, &candidates, self.observer)?;

        self.observer.on_phase(Phase::Complete);
        info!("restored {} files", restored);

        Ok(RestoreResult {
            restored,
            skipped: entries.len() - candidates.len(),
            duration: start.elapsed(),
        })
    }
}
