//! Backup and restore observation
//!
//! The archive engine never prints or logs progress on its own. It reports
//! through a [`BackupObserver`], and the caller decides how to present it.
//! [`TracingObserver`] logs events with the `tracing` crate and
//! [`crate::progress::ProgressObserver`] drives a progress bar.

use std::fmt;
use std::path::Path;
use tracing::{debug, info, warn};

/// Stage of a backup or restore operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Walking the configured directories
    Scanning,
    /// Writing files into the archive
    Archiving,
    /// Reading the archive entry list
    Loading,
    /// Checking restore targets against the filesystem
    Checking,
    /// Writing archive entries to the filesystem
    Extracting,
    /// Operation finished successfully
    Complete,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scanning => "scanning",
            Self::Archiving => "archiving",
            Self::Loading => "loading",
            Self::Checking => "checking",
            Self::Extracting => "extracting",
            Self::Complete => "complete",
        }
    }

    /// Human readable description of the phase
    pub fn description(&self) -> &'static str {
        match self {
            Self::Scanning => "counting files...",
            Self::Archiving => "creating archive...",
            Self::Loading => "loading backup file...",
            Self::Checking => "checking restore paths to avoid overwriting existing files...",
            Self::Extracting => "restoring files...",
            Self::Complete => "done",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Observer trait for backup and restore events
///
/// Only [`on_phase`](Self::on_phase) and
/// [`on_file_archived`](Self::on_file_archived) are required; the remaining
/// callbacks default to doing nothing.
pub trait BackupObserver {
    /// Called when the operation enters a new phase
    fn on_phase(&self, phase: Phase);

    /// Called once the number of files to process is known
    fn on_files_counted(&self, total: u64) {
        let _ = total;
    }

    /// Called when a configured directory is about to be archived
    fn on_directory_added(&self, directory: &Path) {
        let _ = directory;
    }

    /// Called when a configured directory does not exist and is skipped
    fn on_directory_skipped(&self, directory: &Path) {
        let _ = directory;
    }

    /// Called after a file has been written into the archive
    fn on_file_archived(&self, path: &Path);

    /// Called after a file has been written back to the filesystem
    fn on_file_restored(&self, path: &Path) {
        let _ = path;
    }
}

/// A no-op observer that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl BackupObserver for NoOpObserver {
    fn on_phase(&self, _phase: Phase) {}

    fn on_file_archived(&self, _path: &Path) {}
}

/// An observer that logs events using the `tracing` crate
///
/// # Log Levels
///
/// - phases, added directories: INFO
/// - skipped directories: WARN
/// - individual files: DEBUG
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl BackupObserver for TracingObserver {
    fn on_phase(&self, phase: Phase) {
        match phase {
            Phase::Complete => debug!("phase complete"),
            _ => info!("{}", phase.description()),
        }
    }

    fn on_files_counted(&self, total: u64) {
        debug!("total number of files is {}", total);
    }

    fn on_directory_added(&self, directory: &Path) {
        info!("adding directory {}", directory.display());
    }

    fn on_directory_skipped(&self, directory: &Path) {
        warn!("skipping missing directory {}", directory.display());
    }

    fn on_file_archived(&self, path: &Path) {
        debug!("file: {}", path.display());
    }

    fn on_file_restored(&self, path: &Path) {
        debug!("restored: {}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct CountingObserver {
        phases: RefCell<Vec<Phase>>,
        archived: RefCell<usize>,
    }

    impl BackupObserver for CountingObserver {
        fn on_phase(&self, phase: Phase) {
            self.phases.borrow_mut().push(phase);
        }

        fn on_file_archived(&self, _path: &Path) {
            *self.archived.borrow_mut() += 1;
        }
    }

    #[test]
    fn test_phase_names() {
        assert_eq!(Phase::Scanning.to_string(), "scanning");
        assert_eq!(Phase::Extracting.as_str(), "extracting");
        assert!(Phase::Checking.description().contains("overwriting"));
    }

    #[test]
    fn test_default_callbacks_are_noops() {
        let observer = CountingObserver::default();
        observer.on_files_counted(3);
        observer.on_directory_added(Path::new("/tmp/a"));
        observer.on_directory_skipped(Path::new("/tmp/b"));
        observer.on_file_restored(Path::new("/tmp/a/f"));
        assert!(observer.phases.borrow().is_empty());
        assert_eq!(*observer.archived.borrow(), 0);
    }

    #[test]
    fn test_builtin_observers_accept_all_events() {
        for observer in [&NoOpObserver as &dyn BackupObserver, &TracingObserver] {
            observer.on_phase(Phase::Loading);
            observer.on_files_counted(1);
            observer.on_file_archived(Path::new("/tmp/x"));
            observer.on_phase(Phase::Complete);
        }
    }
}
