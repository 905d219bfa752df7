//! Progress reporting for backup and restore operations.
//!
//! Provides visual feedback during long-running archive and extract phases.

use crate::observer::{BackupObserver, Phase, TracingObserver};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

const BAR_TEMPLATE: &str = "{msg} [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%)";

/// Observer that drives a progress bar, one tick per archived or restored file.
///
/// Log lines are still emitted through [`TracingObserver`], suspended around
/// the bar so the two do not interleave on the terminal.
#[derive(Debug)]
pub struct ProgressObserver {
    bar: ProgressBar,
    log: TracingObserver,
}

impl ProgressObserver {
    /// Creates a new progress observer drawing to stderr.
    pub fn new() -> Self {
        Self::with_bar(ProgressBar::new(0))
    }

    /// Creates a progress observer around an existing bar.
    pub fn with_bar(bar: ProgressBar) -> Self {
        let style = ProgressStyle::default_bar()
            .template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        bar.set_style(style);
        Self {
            bar,
            log: TracingObserver,
        }
    }

    /// Current bar position.
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Current bar length.
    pub fn length(&self) -> Option<u64> {
        self.bar.length()
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl BackupObserver for ProgressObserver {
    fn on_phase(&self, phase: Phase) {
        self.bar.suspend(|| self.log.on_phase(phase));
        match phase {
            Phase::Archiving => self.bar.set_message("Archiving"),
            Phase::Extracting => self.bar.set_message("Restoring"),
            Phase::Complete => self.bar.finish_and_clear(),
            _ => {}
        }
    }

    fn on_files_counted(&self, total: u64) {
        self.bar.suspend(|| self.log.on_files_counted(total));
        self.bar.set_length(total);
        self.bar.set_position(0);
    }

    fn on_directory_added(&self, directory: &Path) {
        self.bar.suspend(|| self.log.on_directory_added(directory));
    }

    fn on_directory_skipped(&self, directory: &Path) {
        self.bar.suspend(|| self.log.on_directory_skipped(directory));
    }

    fn on_file_archived(&self, path: &Path) {
        self.bar.suspend(|| self.log.on_file_archived(path));
        self.bar.inc(1);
    }

    fn on_file_restored(&self, path: &Path) {
        self.bar.suspend(|| self.log.on_file_restored(path));
        self.bar.inc(1);
    }
}

impl Drop for ProgressObserver {
    fn drop(&mut self) {
        // Failed operations never reach Phase::Complete
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}
