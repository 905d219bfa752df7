//! Restore selection.
//!
//! An archive entry is eligible for restore when its stored name starts with
//! one of the configured directories, compared with the leading `/` removed.
//! The comparison is textual, so `var/lib/rundeck/data` also selects
//! `var/lib/rundeck/data2/...`, matching the overlap rule used when the
//! directory set is validated.

use crate::reader::ArchiveEntry;
use keeper_core::DirectorySet;
use tracing::debug;

/// Selects the archive entries that belong to a directory set.
#[derive(Debug, Clone)]
pub struct RestoreFilter {
    prefixes: Vec<String>,
}

impl RestoreFilter {
    /// Creates a filter for the given directories.
    pub fn new(directories: &DirectorySet) -> Self {
        Self {
            prefixes: directories.archive_prefixes().map(str::to_string).collect(),
        }
    }

    /// Checks whether an archive name falls under one of the directories.
    pub fn matches(&self, name: &str) -> bool {
        self.prefixes.iter().any(|prefix| name.starts_with(prefix.as_str()))
    }

    /// Returns the file entries eligible for restore, in archive order.
    pub fn select(&self, entries: &[ArchiveEntry]) -> Vec<ArchiveEntry> {
        entries
            .iter()
            .filter(|entry| {
                if !entry.is_file() {
                    debug!("ignoring non-file entry {}", entry.name());
                    return false;
                }
                self.matches(&entry.name())
            })
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::EntryKind;
    use std::path::PathBuf;

    fn file(name: &str) -> ArchiveEntry {
        ArchiveEntry {
            path: PathBuf::from(name),
            size: 1,
            kind: EntryKind::File,
        }
    }

    fn filter(dirs: &[&str]) -> RestoreFilter {
        RestoreFilter::new(&DirectorySet::new(dirs.iter().copied()).unwrap())
    }

    #[test]
    fn test_matches_stripped_prefix() {
        let filter = filter(&["/var/lib/rundeck/data"]);
        assert!(filter.matches("var/lib/rundeck/data/grails.db"));
        assert!(!filter.matches("/var/lib/rundeck/data/grails.db"));
        assert!(!filter.matches("var/lib/rundeck/logs/service.log"));
    }

    #[test]
    fn test_prefix_match_is_textual() {
        let filter = filter(&["/srv/data"]);
        assert!(filter.matches("srv/data2/file"));
    }

    #[test]
    fn test_select_preserves_archive_order() {
        let filter = filter(&["/tmp/locker", "/tmp/drawer"]);
        let entries = vec![
            file("tmp/drawer/file4"),
            file("tmp/other/file6"),
            file("tmp/locker/file5.txt"),
        ];

        let selected: Vec<String> = filter
            .select(&entries)
            .iter()
            .map(|e| e.name().into_owned())
            .collect();

        assert_eq!(selected, vec!["tmp/drawer/file4", "tmp/locker/file5.txt"]);
    }

    #[test]
    fn test_select_skips_directories() {
        let filter = filter(&["/tmp/drawer"]);
        let entries = vec![
            ArchiveEntry {
                path: PathBuf::from("tmp/drawer"),
                size: 0,
                kind: EntryKind::Directory,
            },
            file("tmp/drawer/file4"),
        ];

        assert_eq!(filter.select(&entries), vec![file("tmp/drawer/file4")]);
    }

    #[test]
    fn test_empty_directory_set_selects_nothing() {
        let filter = RestoreFilter::new(&DirectorySet::new(Vec::<String>::new()).unwrap());
        assert!(filter.select(&[file("tmp/a")]).is_empty());
    }
}
