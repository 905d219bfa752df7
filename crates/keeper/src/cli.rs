//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

// Re-export command types for convenience
pub use crate::commands::backup::BackupArgs;
pub use crate::commands::restore::RestoreArgs;

/// keeper - back up and restore the data directories of a stopped service
#[derive(Parser, Debug)]
#[command(name = "keeper")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "debug")]
    pub quiet: bool,

    /// Disable the progress bar
    #[arg(long, global = true)]
    pub no_progress: bool,

    /// Path to keeper.yaml config file
    #[arg(short, long, global = true)]
    pub config: Option<Utf8PathBuf>,

    /// Comma-separated directories to use instead of the configured set
    #[arg(long, global = true, value_delimiter = ',', value_name = "DIRS")]
    pub dirs: Option<Vec<String>>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Directories given with `--dirs`, trimmed and without empty items.
    pub fn dir_overrides(&self) -> Option<Vec<String>> {
        let dirs: Vec<String> = self
            .dirs
            .as_ref()?
            .iter()
            .map(|d| d.trim())
            .filter(|d| !d.is_empty())
            .map(str::to_string)
            .collect();

        if dirs.is_empty() {
            None
        } else {
            Some(dirs)
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Archive the service directories
    Backup(BackupArgs),

    /// Restore service directories from an archive
    Restore(RestoreArgs),
}
