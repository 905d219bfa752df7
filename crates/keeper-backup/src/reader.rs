//! Archive reading for restores.
//!
//! A gzip stream cannot be rewound, so listing entries and extracting them
//! each open the archive afresh. The file handle is owned by the operation
//! and closed when it returns, on error paths too.

use crate::error::{Error, Result};
use crate::observer::BackupObserver;
use flate2::read::GzDecoder;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tar::{Archive, EntryType};
use tracing::debug;

/// Kind of an archive member
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Other,
}

impl From<EntryType> for EntryKind {
    fn from(entry_type: EntryType) -> Self {
        if entry_type.is_file() || entry_type.is_contiguous() {
            Self::File
        } else if entry_type.is_dir() {
            Self::Directory
        } else {
            Self::Other
        }
    }
}

/// Metadata of one archive member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Relative path stored in the archive
    pub path: PathBuf,

    /// Content size in bytes
    pub size: u64,

    pub kind: EntryKind,
}

impl ArchiveEntry {
    /// Entry path as text, for prefix matching against configured directories
    pub fn name(&self) -> std::borrow::Cow<'_, str> {
        self.path.to_string_lossy()
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

/// Read-only view of an existing backup archive.
#[derive(Debug, Clone)]
pub struct ArchiveReader {
    path: PathBuf,
}

impl ArchiveReader {
    /// Opens an archive, failing if the file does not exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.is_file() {
            return Err(Error::archive_not_found(path.display().to_string()));
        }
        Ok(Self { path })
    }

    fn archive(&self) -> Result<Archive<GzDecoder<BufReader<File>>>> {
        let file = File::open(&self.path)?;
        Ok(Archive::new(GzDecoder::new(BufReader::new(file))))
    }

    /// Lists every entry in archive order.
    pub fn entries(&self) -> Result<Vec<ArchiveEntry>> {
        let mut archive = self.archive()?;
        let mut entries = Vec::new();

        for entry in archive.entries()? {
            let entry = entry?;
            entries.push(ArchiveEntry {
                path: entry.path()?.into_owned(),
                size: entry.size(),
                kind: entry.header().entry_type().into(),
            });
        }

        debug!("{} entries in {}", entries.len(), self.path.display());
        Ok(entries)
    }

    /// Extracts `selected` entries under `root`, creating parent directories
    /// as needed. Entries not in `selected` are skipped.
    ///
    /// Returns the number of files written.
    pub fn extract(
        &self,
        root: &Path,
        selected: &[ArchiveEntry],
        observer: &dyn BackupObserver,
    ) -> Result<usize> {
        let wanted: HashSet<&Path> = selected.iter().map(|e| e.path.as_path()).collect();
        let mut archive = self.archive()?;
        let mut restored = 0;

        for entry in archive.entries()? {
            let mut entry = entry?;
            let entry_path = entry.path()?.into_owned();
            if !wanted.contains(entry_path.as_path()) {
                continue;
            }

            let target = root.join(&entry_path);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| Error::extract(&target, e))?;
            }

            entry
                .unpack(&target)
                .map_err(|e| Error::extract(&target, e))?;
            observer.on_file_restored(&target);
            restored += 1;
        }

        Ok(restored)
    }
}
