//! Backup and restore orchestration.
//!
//! Setting up a [`BackupRestoreService`] takes two steps.
//! [`check_preconditions`] asks the service manager whether the managed
//! service is running and validates the directory set. The constructor then
//! takes the validated set and has no side effects.
//!
//! ```no_run
//! use keeper_backup::{check_preconditions, BackupRestoreService};
//! use keeper_core::ServiceCommand;
//! use std::path::Path;
//!
//! fn main() -> keeper_backup::Result<()> {
//!     let directories = check_preconditions(&ServiceCommand::default(), None, false)?;
//!     let service = BackupRestoreService::new(directories);
//!
//!     let result = service.backup(Path::new("/var/backups"), "rundeck.tar.gz")?;
//!     println!("archived {} files", result.file_count);
//!     Ok(())
//! }
//! ```

use crate::archive::{ArchiveWriter, BackupOptions, BackupResult};
use crate::error::{Error, Result};
use crate::observer::{BackupObserver, TracingObserver};
use crate::restore::{RestoreResult, Restorer, DEFAULT_RESTORE_ROOT};
use keeper_core::{DirectorySet, ServiceStatus};
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

/// Refuses to proceed while the managed service runs, then validates the
/// requested directories (or falls back to the defaults).
///
/// The status query happens before the directories are looked at, so a
/// running service fails without touching the filesystem. With
/// `ignore_running` a running service is logged and tolerated.
pub fn check_preconditions<S>(
    status: &S,
    directories: Option<Vec<String>>,
    ignore_running: bool,
) -> Result<DirectorySet>
where
    S: ServiceStatus + ?Sized,
{
    debug!("checking status of {}", status.service_name());

    if status.is_running()? {
        if ignore_running {
            warn!(
                "{} is running, continuing because running services are ignored",
                status.service_name()
            );
        } else {
            error!(
                "{} must be stopped before taking a backup or restoring from one",
                status.service_name()
            );
            return Err(Error::Core(keeper_core::Error::service_active(
                status.service_name(),
            )));
        }
    }

    let directories = match directories {
        Some(paths) => DirectorySet::new(paths)?,
        None => DirectorySet::default(),
    };
    debug!("using directories {}", directories);

    Ok(directories)
}

/// Backs up and restores a validated directory set.
pub struct BackupRestoreService {
    directories: DirectorySet,
    observer: Box<dyn BackupObserver>,
    backup_options: BackupOptions,
    restore_root: PathBuf,
}

impl BackupRestoreService {
    /// Creates a service that reports through [`TracingObserver`].
    pub fn new(directories: DirectorySet) -> Self {
        Self {
            directories,
            observer: Box::new(TracingObserver),
            backup_options: BackupOptions::default(),
            restore_root: PathBuf::from(DEFAULT_RESTORE_ROOT),
        }
    }

    pub fn with_observer(mut self, observer: Box<dyn BackupObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_backup_options(mut self, options: BackupOptions) -> Self {
        self.backup_options = options;
        self
    }

    /// Restores under `root` instead of `/`.
    pub fn with_restore_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.restore_root = root.into();
        self
    }

    pub fn directories(&self) -> &DirectorySet {
        &self.directories
    }

    /// Archives the directory set into `destination/filename`.
    pub fn backup(&self, destination: &Path, filename: &str) -> Result<BackupResult> {
        ArchiveWriter::new(&self.directories, self.observer.as_ref())
            .with_options(self.backup_options.clone())
            .create(destination, filename)
    }

    /// Restores the entries of `archive` that fall under the directory set.
    pub fn restore(&self, archive: &Path) -> Result<RestoreResult> {
        Restorer::new(&self.directories, self.observer.as_ref())
            .with_root(&self.restore_root)
            .restore(archive)
    }
}
