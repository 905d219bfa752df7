//! Command implementations

pub mod backup;
pub mod restore;

use anyhow::{Context, Result};
use camino::Utf8Path;
use keeper_backup::{BackupObserver, ProgressObserver, TracingObserver};
use keeper_core::{KeeperConfig, ServiceCommand};

/// Settings shared by every command.
#[derive(Debug)]
pub struct RunContext {
    pub config: KeeperConfig,

    /// Directories given on the command line
    pub dir_overrides: Option<Vec<String>>,

    pub show_progress: bool,
}

impl RunContext {
    pub fn load(
        config_path: Option<&Utf8Path>,
        dir_overrides: Option<Vec<String>>,
        show_progress: bool,
    ) -> Result<Self> {
        let config = KeeperConfig::load(config_path).context("Failed to load configuration")?;

        Ok(Self {
            config,
            dir_overrides,
            show_progress,
        })
    }

    /// Directories to validate: `--dirs`, then the config file, else `None`
    /// for the built-in defaults.
    pub fn requested_directories(&self) -> Option<Vec<String>> {
        self.config.requested_directories(self.dir_overrides.clone())
    }

    /// Only a command-line override makes a backup partial.
    pub fn is_partial(&self) -> bool {
        self.dir_overrides.is_some()
    }

    pub fn service_status(&self) -> ServiceCommand {
        ServiceCommand::new(self.config.service())
    }

    pub fn observer(&self) -> Box<dyn BackupObserver> {
        if self.show_progress {
            Box::new(ProgressObserver::new())
        } else {
            Box::new(TracingObserver)
        }
    }
}
