//! Directory sets for backup and restore
//!
//! A [`DirectorySet`] is the ordered list of absolute directories that a
//! backup archives and a restore is allowed to write back. It is validated
//! once when built and immutable afterwards.
//!
//! Validation rejects:
//! - duplicate paths
//! - paths where one is a textual substring of another, in either order
//! - relative paths
//!
//! The overlap test is plain substring containment, not a path-segment
//! comparison, so `/var/lib` and `/var/libx` are also reported as overlapping.

use crate::error::{Error, Result};
use camino::Utf8PathBuf;
use std::fmt;
use tracing::error;

/// Directories backed up and restored when no override is configured.
pub const DEFAULT_DIRECTORIES: &[&str] = &[
    "/var/lib/rundeck/data",        // database
    "/var/lib/rundeck/logs",        // execution logs (biggest)
    "/var/lib/rundeck/.ssh",        // ssh keys
    "/var/lib/rundeck/var/storage", // key storage files and metadata
    "/var/rundeck/projects",        // project definitions
];

/// Validated, ordered set of absolute directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectorySet {
    paths: Vec<Utf8PathBuf>,
}

impl DirectorySet {
    /// Validate `paths` and build a directory set from them.
    pub fn new<I, S>(paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let paths: Vec<String> = paths.into_iter().map(Into::into).collect();
        validate(&paths)?;

        Ok(Self {
            paths: paths.into_iter().map(Utf8PathBuf::from).collect(),
        })
    }

    /// The directories, in configuration order.
    pub fn paths(&self) -> &[Utf8PathBuf] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// The directories with their leading `/` removed, matching how entry
    /// names are stored inside an archive.
    pub fn archive_prefixes(&self) -> impl Iterator<Item = &str> {
        self.paths
            .iter()
            .map(|p| p.as_str().strip_prefix('/').unwrap_or(p.as_str()))
    }
}

impl Default for DirectorySet {
    fn default() -> Self {
        Self {
            paths: DEFAULT_DIRECTORIES
                .iter()
                .map(|p| Utf8PathBuf::from(*p))
                .collect(),
        }
    }
}

impl fmt::Display for DirectorySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .paths
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(",");
        f.write_str(&joined)
    }
}

/// Validate a list of directories.
///
/// Fails with [`Error::Configuration`] on the first duplicate or overlapping
/// pair, or on the first relative path.
pub fn validate<S: AsRef<str>>(paths: &[S]) -> Result<()> {
    if let Some((first, second)) = find_overlap(paths) {
        error!("found conflicting paths {},{}", first, second);
        return Err(Error::configuration(format!(
            "duplicate or overlapping directories detected: {}, {}",
            first, second
        )));
    }

    for path in paths {
        let path = path.as_ref();
        if !path.starts_with('/') {
            return Err(Error::configuration(format!(
                "relative paths not allowed, please fix {:?}",
                path
            )));
        }
    }

    Ok(())
}

/// Return the first pair of paths where one contains the other as a substring.
///
/// Each path is compared against every path after it, so pairs are reported
/// in configuration order.
pub fn find_overlap<S: AsRef<str>>(paths: &[S]) -> Option<(&str, &str)> {
    for (i, first) in paths.iter().enumerate() {
        let first = first.as_ref();
        for second in &paths[i + 1..] {
            let second = second.as_ref();
            if first.contains(second) || second.contains(first) {
                return Some((first, second));
            }
        }
    }
    None
}
