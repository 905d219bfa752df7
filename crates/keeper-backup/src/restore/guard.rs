//! Overwrite protection for restores.
//!
//! The guard runs as a complete pass over the candidates before anything is
//! extracted. A single existing target refuses the whole restore, as does
//! a non-directory sitting where one of the target's parent directories
//! has to be created.

use super::validation::validate_entry_path;
use crate::error::{Error, Result};
use crate::reader::ArchiveEntry;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Refuses restores that would replace files already on disk.
#[derive(Debug, Clone)]
pub struct OverwriteGuard {
    root: PathBuf,
}

impl OverwriteGuard {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Filesystem location an entry is restored to.
    pub fn target_for(&self, entry: &ArchiveEntry) -> PathBuf {
        self.root.join(&entry.path)
    }

    /// Checks every candidate, failing on the first unsafe name or existing
    /// target. Dangling symlinks count as existing.
    pub fn check(&self, candidates: &[ArchiveEntry]) -> Result<()> {
        for entry in candidates {
            validate_entry_path(&entry.path)?;

            let target = self.target_for(entry);
            debug!("checking {}", target.display());

            if let Some(blocker) = self.blocking_ancestor(entry) {
                error!(
                    "{} exists and is not a directory, cannot restore {}",
                    blocker.display(),
                    target.display()
                );
                return Err(Error::restore_conflict(blocker.display().to_string()));
            }

            if fs::symlink_metadata(&target).is_ok() {
                error!(
                    "File {} already exists. Please remove or move existing files before restoring.",
                    target.display()
                );
                return Err(Error::restore_conflict(target.display().to_string()));
            }
        }

        Ok(())
    }

    /// First parent directory of the entry, walking down from the root,
    /// that exists but does not resolve to a directory.
    fn blocking_ancestor(&self, entry: &ArchiveEntry) -> Option<PathBuf> {
        let parent = entry.path.parent()?;
        let mut ancestors: Vec<&Path> = parent
            .ancestors()
            .filter(|a| !a.as_os_str().is_empty())
            .collect();
        ancestors.reverse();

        ancestors
            .into_iter()
            .map(|a| self.root.join(a))
            .find(|dir| fs::symlink_metadata(dir).is_ok() && !dir.is_dir())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::EntryKind;
    use tempfile::TempDir;

    fn file(name: &str) -> ArchiveEntry {
        ArchiveEntry {
            path: PathBuf::from(name),
            size: 0,
            kind: EntryKind::File,
        }
    }

    #[test]
    fn test_target_joins_root() {
        let guard = OverwriteGuard::new("/");
        assert_eq!(
            guard.target_for(&file("etc/rundeck/realm.properties")),
            PathBuf::from("/etc/rundeck/realm.properties")
        );
    }

    #[test]
    fn test_no_conflicts() {
        let root = TempDir::new().unwrap();
        let guard = OverwriteGuard::new(root.path());
        assert!(guard.check(&[file("a/b.txt"), file("c.txt")]).is_ok());
    }

    #[test]
    fn test_first_conflict_reported() {
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join("a")).unwrap();
        fs::write(root.path().join("a/second.txt"), "x").unwrap();
        fs::write(root.path().join("a/third.txt"), "x").unwrap();

        let guard = OverwriteGuard::new(root.path());
        let err = guard
            .check(&[file("a/first.txt"), file("a/second.txt"), file("a/third.txt")])
            .unwrap_err();

        match err {
            Error::RestoreConflict { path } => assert!(path.ends_with("a/second.txt")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_file_in_place_of_parent_directory() {
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join("data")).unwrap();
        fs::write(root.path().join("data/sub"), "not a directory").unwrap();

        let guard = OverwriteGuard::new(root.path());
        let err = guard
            .check(&[file("data/a.txt"), file("data/sub/b.txt")])
            .unwrap_err();

        match err {
            Error::RestoreConflict { path } => {
                assert_eq!(path, root.path().join("data/sub").display().to_string())
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_existing_parent_directories_are_fine() {
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join("data/sub")).unwrap();

        let guard = OverwriteGuard::new(root.path());
        assert!(guard.check(&[file("data/sub/b.txt")]).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_parent_directory_is_fine() {
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join("real")).unwrap();
        std::os::unix::fs::symlink(root.path().join("real"), root.path().join("data")).unwrap();

        let guard = OverwriteGuard::new(root.path());
        assert!(guard.check(&[file("data/b.txt")]).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_conflict() {
        let root = TempDir::new().unwrap();
        std::os::unix::fs::symlink(root.path().join("gone"), root.path().join("link")).unwrap();

        let guard = OverwriteGuard::new(root.path());
        assert!(matches!(
            guard.check(&[file("link")]),
            Err(Error::RestoreConflict { .. })
        ));
    }

    #[test]
    fn test_unsafe_entry_rejected_before_any_check() {
        let root = TempDir::new().unwrap();
        let guard = OverwriteGuard::new(root.path());
        assert!(matches!(
            guard.check(&[file("../escape.txt")]),
            Err(Error::UnsafeEntryPath { .. })
        ));
    }
}
