//! Archive creation for backups.
//!
//! Every regular file below the configured directories is stored in a
//! gzip-compressed tar archive under its absolute path with the leading `/`
//! removed, e.g. `/var/lib/rundeck/data/grails.db` becomes
//! `var/lib/rundeck/data/grails.db`. Symbolic links are followed, so the
//! archive always holds file content rather than links. Empty directories
//! produce no entries.

use crate::error::{Error, Result};
use crate::observer::{BackupObserver, Phase};
use camino::Utf8PathBuf;
use flate2::write::GzEncoder;
use flate2::Compression;
use keeper_core::DirectorySet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tar::Builder as TarBuilder;
use tracing::debug;
use walkdir::WalkDir;

/// Default gzip compression level
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// Result of a backup operation.
#[derive(Debug, Clone)]
pub struct BackupResult {
    /// Path to the created archive
    pub archive_path: PathBuf,

    /// Size of the archive in bytes
    pub size_bytes: u64,

    /// Number of files included
    pub file_count: usize,

    /// Configured directories that did not exist and were skipped
    pub skipped_directories: Vec<Utf8PathBuf>,

    /// Duration of the operation
    pub duration: Duration,
}

/// Options for archive creation.
#[derive(Debug, Clone)]
pub struct BackupOptions {
    /// Compression level (1-9)
    pub compression_level: u32,

    /// Create the destination directory when it does not exist
    pub create_destination: bool,
}

impl Default for BackupOptions {
    fn default() -> Self {
        Self {
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            create_destination: true,
        }
    }
}

impl BackupOptions {
    /// Sets the compression level.
    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression_level = level.clamp(1, 9);
        self
    }

    /// Sets whether a missing destination directory is created.
    pub fn with_create_destination(mut self, create: bool) -> Self {
        self.create_destination = create;
        self
    }
}

/// A file found while scanning the configured directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    /// Path on the filesystem
    pub source: PathBuf,

    /// Name stored in the archive
    pub name: PathBuf,
}

/// Files to archive and the directories that were missing.
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    pub files: Vec<ScannedFile>,
    pub skipped_directories: Vec<Utf8PathBuf>,
}

/// Writes the configured directories into a compressed archive.
pub struct ArchiveWriter<'a> {
    directories: &'a DirectorySet,
    options: BackupOptions,
    observer: &'a dyn BackupObserver,
}

impl<'a> ArchiveWriter<'a> {
    /// Creates a new archive writer.
    pub fn new(directories: &'a DirectorySet, observer: &'a dyn BackupObserver) -> Self {
        Self {
            directories,
            options: BackupOptions::default(),
            observer,
        }
    }

    /// Replaces the backup options.
    pub fn with_options(mut self, options: BackupOptions) -> Self {
        self.options = options;
        self
    }

    /// Creates `destination/filename` from the configured directories.
    pub fn create(&self, destination: &Path, filename: &str) -> Result<BackupResult> {
        let start_time = Instant::now();

        self.prepare_destination(destination)?;

        let archive_path = destination.join(filename);
        debug!("using full backup path {}", archive_path.display());

        self.observer.on_phase(Phase::Scanning);
        let scan = self.scan()?;
        self.observer.on_files_counted(scan.files.len() as u64);

        self.observer.on_phase(Phase::Archiving);
        if let Err(e) = self.write_archive(&archive_path, &scan.files) {
            // Never leave a truncated archive behind
            let _ = fs::remove_file(&archive_path);
            return Err(e);
        }

        let size_bytes = fs::metadata(&archive_path)?.len();
        self.observer.on_phase(Phase::Complete);

        Ok(BackupResult {
            archive_path,
            size_bytes,
            file_count: scan.files.len(),
            skipped_directories: scan.skipped_directories,
            duration: start_time.elapsed(),
        })
    }

    /// Walks the configured directories and returns the files to archive.
    ///
    /// Directories are visited in configuration order and their contents in
    /// file name order, so the archive layout is deterministic.
    pub fn scan(&self) -> Result<ScanResult> {
        let mut result = ScanResult::default();

        for directory in self.directories.paths() {
            let dir = directory.as_std_path();
            if !dir.is_dir() {
                self.observer.on_directory_skipped(dir);
                result.skipped_directories.push(directory.to_owned());
                continue;
            }

            self.observer.on_directory_added(dir);

            for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
                let entry = entry?;
                debug!("visiting: {}", entry.path().display());

                if entry.file_type().is_file() {
                    result.files.push(ScannedFile {
                        source: entry.path().to_path_buf(),
                        name: archive_name(entry.path()),
                    });
                }
            }
        }

        Ok(result)
    }

    /// Check that the destination is a directory, creating it if allowed.
    fn prepare_destination(&self, destination: &Path) -> Result<()> {
        if destination.is_dir() {
            return Ok(());
        }

        if destination.exists() {
            return Err(Error::destination_not_directory(
                destination.display().to_string(),
            ));
        }

        if !self.options.create_destination {
            return Err(Error::destination_not_found(
                destination.display().to_string(),
            ));
        }

        debug!(
            "backup directory {} not found; creating now",
            destination.display()
        );
        fs::create_dir_all(destination)?;
        Ok(())
    }

    /// Streams the files into a gzip-compressed tar archive.
    fn write_archive(&self, archive_path: &Path, files: &[ScannedFile]) -> Result<()> {
        let file = File::create(archive_path)?;
        let encoder = GzEncoder::new(
            BufWriter::new(file),
            Compression::new(self.options.compression_level),
        );

        let mut tar = TarBuilder::new(encoder);
        tar.follow_symlinks(true);

        for scanned in files {
            tar.append_path_with_name(&scanned.source, &scanned.name)?;
            self.observer.on_file_archived(&scanned.source);
        }

        let encoder = tar.into_inner()?;
        let mut writer = encoder.finish()?;
        writer.flush()?;

        Ok(())
    }
}

/// Name of a file inside the archive: its path without the leading `/`.
pub fn archive_name(path: &Path) -> PathBuf {
    path.strip_prefix("/").unwrap_or(path).to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::NoOpObserver;
    use flate2::read::GzDecoder;
    use tempfile::TempDir;

    fn utf8(path: &Path) -> String {
        path.to_str().expect("temp paths are UTF-8").to_string()
    }

    fn list_archive(path: &Path) -> Vec<String> {
        let file = File::open(path).unwrap();
        let mut archive = tar::Archive::new(GzDecoder::new(file));
        archive
            .entries()
            .unwrap()
            .map(|e| e.unwrap().path().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_archive_name_strips_root() {
        assert_eq!(
            archive_name(Path::new("/var/lib/rundeck/data/a.db")),
            PathBuf::from("var/lib/rundeck/data/a.db")
        );
        assert_eq!(archive_name(Path::new("rel/a")), PathBuf::from("rel/a"));
    }

    #[test]
    fn test_backup_options_builder() {
        let options = BackupOptions::default()
            .with_compression_level(15)
            .with_create_destination(false);

        assert_eq!(options.compression_level, 9);
        assert!(!options.create_destination);
        assert_eq!(
            BackupOptions::default().with_compression_level(0).compression_level,
            1
        );
    }

    #[test]
    fn test_archive_contains_only_files() {
        let source = TempDir::new().unwrap();
        let base = source.path();
        fs::create_dir_all(base.join("data/nested/empty")).unwrap();
        fs::write(base.join("data/a.txt"), "a").unwrap();
        fs::write(base.join("data/nested/b.txt"), "b").unwrap();

        let dirs = DirectorySet::new([utf8(&base.join("data"))]).unwrap();
        let output = TempDir::new().unwrap();

        let writer = ArchiveWriter::new(&dirs, &NoOpObserver);
        let result = writer.create(output.path(), "backup.tar.gz").unwrap();

        assert_eq!(result.file_count, 2);
        assert!(result.size_bytes > 0);
        assert!(result.skipped_directories.is_empty());

        let expected: Vec<String> = ["data/a.txt", "data/nested/b.txt"]
            .iter()
            .map(|p| utf8(&archive_name(&base.join(p))))
            .collect();
        assert_eq!(list_archive(&result.archive_path), expected);
    }

    #[test]
    fn test_missing_directory_is_skipped() {
        let source = TempDir::new().unwrap();
        let present = source.path().join("present");
        fs::create_dir_all(&present).unwrap();
        fs::write(present.join("f"), "x").unwrap();
        let missing = source.path().join("missing");

        let dirs = DirectorySet::new([utf8(&present), utf8(&missing)]).unwrap();
        let output = TempDir::new().unwrap();

        let result = ArchiveWriter::new(&dirs, &NoOpObserver)
            .create(output.path(), "b.tar.gz")
            .unwrap();

        assert_eq!(result.file_count, 1);
        assert_eq!(result.skipped_directories, vec![Utf8PathBuf::from(utf8(&missing))]);
    }

    #[test]
    fn test_destination_created_by_default() {
        let source = TempDir::new().unwrap();
        let dirs = DirectorySet::new([utf8(source.path())]).unwrap();
        let output = TempDir::new().unwrap();
        let destination = output.path().join("new/backups");

        let result = ArchiveWriter::new(&dirs, &NoOpObserver)
            .create(&destination, "b.tar.gz")
            .unwrap();

        assert!(destination.is_dir());
        assert_eq!(result.archive_path, destination.join("b.tar.gz"));
        assert_eq!(result.file_count, 0);
    }

    #[test]
    fn test_destination_not_found_when_creation_disabled() {
        let source = TempDir::new().unwrap();
        let dirs = DirectorySet::new([utf8(source.path())]).unwrap();
        let output = TempDir::new().unwrap();
        let destination = output.path().join("absent");

        let err = ArchiveWriter::new(&dirs, &NoOpObserver)
            .with_options(BackupOptions::default().with_create_destination(false))
            .create(&destination, "b.tar.gz")
            .unwrap_err();

        assert!(matches!(err, Error::DestinationNotFound { .. }));
        assert!(!destination.exists());
    }

    #[test]
    fn test_destination_that_is_a_file() {
        let source = TempDir::new().unwrap();
        let dirs = DirectorySet::new([utf8(source.path())]).unwrap();
        let output = TempDir::new().unwrap();
        let destination = output.path().join("occupied");
        fs::write(&destination, "not a dir").unwrap();

        let err = ArchiveWriter::new(&dirs, &NoOpObserver)
            .create(&destination, "b.tar.gz")
            .unwrap_err();

        assert!(matches!(err, Error::DestinationNotDirectory { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_dereferenced() {
        let source = TempDir::new().unwrap();
        let outside = source.path().join("outside");
        let data = source.path().join("data");
        fs::create_dir_all(&outside).unwrap();
        fs::create_dir_all(&data).unwrap();
        fs::write(outside.join("real.txt"), "real content").unwrap();
        std::os::unix::fs::symlink(outside.join("real.txt"), data.join("link.txt")).unwrap();

        let dirs = DirectorySet::new([utf8(&data)]).unwrap();
        let output = TempDir::new().unwrap();
        let result = ArchiveWriter::new(&dirs, &NoOpObserver)
            .create(output.path(), "b.tar.gz")
            .unwrap();

        let file = File::open(&result.archive_path).unwrap();
        let mut archive = tar::Archive::new(GzDecoder::new(file));
        let mut entries = archive.entries().unwrap();
        let mut entry = entries.next().unwrap().unwrap();

        assert_eq!(
            entry.path().unwrap().into_owned(),
            archive_name(&data.join("link.txt"))
        );
        assert_eq!(entry.header().entry_type(), tar::EntryType::Regular);

        let mut content = String::new();
        std::io::Read::read_to_string(&mut entry, &mut content).unwrap();
        assert_eq!(content, "real content");
        assert!(entries.next().is_none());
    }
}
