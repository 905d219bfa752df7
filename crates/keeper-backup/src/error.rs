//! Error types for keeper-backup

use thiserror::Error;

/// Result type alias using keeper-backup's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Backup and restore error types
#[derive(Error, Debug)]
pub enum Error {
    /// Service or configuration error raised before any archive work
    #[error(transparent)]
    Core(#[from] keeper_core::Error),

    /// Backup destination missing and auto-create disabled
    #[error("Backup directory not found: {path}")]
    DestinationNotFound { path: String },

    /// Backup destination exists but is not a directory
    #[error("Backup destination is not a directory: {path}")]
    DestinationNotDirectory { path: String },

    /// Archive to restore from does not exist
    #[error("Backup file not found: {path}")]
    ArchiveNotFound { path: String },

    /// A restore target already exists on the filesystem
    #[error("Refusing to overwrite existing file: {path}")]
    RestoreConflict { path: String },

    /// Archive entry would be written outside the restore root
    #[error("Refusing to restore unsafe archive entry: {path}")]
    UnsafeEntryPath { path: String },

    /// Writing an archive entry to the filesystem failed
    #[error("Failed to restore {path}: {source}")]
    Extract {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal error
    #[error("Failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a destination not found error
    pub fn destination_not_found(path: impl Into<String>) -> Self {
        Self::DestinationNotFound { path: path.into() }
    }

    /// Create a destination not a directory error
    pub fn destination_not_directory(path: impl Into<String>) -> Self {
        Self::DestinationNotDirectory { path: path.into() }
    }

    /// Create an archive not found error
    pub fn archive_not_found(path: impl Into<String>) -> Self {
        Self::ArchiveNotFound { path: path.into() }
    }

    /// Create a restore conflict error
    pub fn restore_conflict(path: impl Into<String>) -> Self {
        Self::RestoreConflict { path: path.into() }
    }

    /// Create an unsafe entry path error
    pub fn unsafe_entry_path(path: impl Into<String>) -> Self {
        Self::UnsafeEntryPath { path: path.into() }
    }

    /// Create an extraction error for the file being restored
    pub fn extract(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Extract {
            path: path.display().to_string(),
            source,
        }
    }

    /// Returns true when the error is a service-active refusal
    pub fn is_service_active(&self) -> bool {
        matches!(self, Self::Core(keeper_core::Error::ServiceActive { .. }))
    }
}
