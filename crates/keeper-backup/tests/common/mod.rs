//! Common test utilities for keeper-backup
//!
//! - A service status stub that records whether it was queried
//! - Fixture directories populated with known files

#![allow(dead_code)]

use keeper_core::ServiceStatus;
use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Service status with a fixed answer.
pub struct StubStatus {
    running: bool,
    pub queries: Cell<usize>,
}

impl StubStatus {
    pub fn stopped() -> Self {
        Self {
            running: false,
            queries: Cell::new(0),
        }
    }

    pub fn running() -> Self {
        Self {
            running: true,
            queries: Cell::new(0),
        }
    }
}

impl ServiceStatus for StubStatus {
    fn service_name(&self) -> &str {
        "rundeckd"
    }

    fn is_running(&self) -> keeper_core::Result<bool> {
        self.queries.set(self.queries.get() + 1);
        Ok(self.running)
    }
}

/// A temporary tree of service directories.
pub struct Fixture {
    pub source: TempDir,
    pub output: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            source: TempDir::new().unwrap(),
            output: TempDir::new().unwrap(),
        }
    }

    /// Absolute path of `relative` inside the source tree.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.source.path().join(relative)
    }

    /// Absolute path of `relative` as a string, for directory sets.
    pub fn dir(&self, relative: &str) -> String {
        utf8(&self.path(relative))
    }

    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }
}

pub fn utf8(path: &Path) -> String {
    path.to_str().expect("temp paths are UTF-8").to_string()
}

/// Archive name of an absolute path.
pub fn stored_name(path: &Path) -> String {
    utf8(path.strip_prefix("/").unwrap())
}
