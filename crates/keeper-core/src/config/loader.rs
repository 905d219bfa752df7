//! Configuration file loading and parsing

use crate::error::{Error, Result};
use crate::service::DEFAULT_SERVICE;
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use std::fs;
use tracing::debug;

/// Configuration file names to search for
pub const CONFIG_FILE_NAMES: &[&str] = &["keeper.yaml", "keeper.yml"];

/// Default prefix of generated archive names
const DEFAULT_FILENAME_PREFIX: &str = "rundeck-backup-";

/// On-disk representation of keeper.yaml
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeeperConfigFile {
    /// Managed service whose status is checked
    #[serde(default)]
    pub service: Option<String>,

    /// Directories to back up and restore, replacing the built-in set
    #[serde(default)]
    pub directories: Option<Vec<String>>,

    /// Prefix of generated archive names
    #[serde(default)]
    pub filename_prefix: Option<String>,
}

/// Loaded keeper configuration
#[derive(Debug, Clone, Default)]
pub struct KeeperConfig {
    /// The parsed configuration
    pub config: KeeperConfigFile,

    /// Path the configuration was read from, if any
    pub config_path: Option<Utf8PathBuf>,
}

impl KeeperConfig {
    /// Load configuration from the specified path, or search the current
    /// directory for keeper.yaml.
    ///
    /// An explicit path must exist. When searching, a missing file yields
    /// the built-in defaults.
    pub fn load(path: Option<&Utf8Path>) -> Result<Self> {
        match path {
            Some(p) => {
                let content = fs::read_to_string(p).map_err(|e| {
                    if e.kind() == std::io::ErrorKind::NotFound {
                        Error::config_not_found(p.as_str())
                    } else {
                        Error::Io(e)
                    }
                })?;
                Self::from_str_at(&content, Some(p.to_owned()))
            }
            None => {
                let cwd = std::env::current_dir()?;
                let cwd = Utf8PathBuf::try_from(cwd).map_err(|_| {
                    Error::configuration("Current directory path is not valid UTF-8")
                })?;
                Self::find_in(&cwd)
            }
        }
    }

    /// Search `dir` for a configuration file, falling back to defaults.
    pub fn find_in(dir: &Utf8Path) -> Result<Self> {
        for name in CONFIG_FILE_NAMES {
            let path = dir.join(name);
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                return Self::from_str_at(&content, Some(path));
            }
        }

        debug!("No configuration file in {}, using defaults", dir);
        Ok(Self::default())
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        Self::from_str_at(content, None)
    }

    fn from_str_at(content: &str, config_path: Option<Utf8PathBuf>) -> Result<Self> {
        let config: KeeperConfigFile = if content.trim().is_empty() {
            KeeperConfigFile::default()
        } else {
            serde_yaml_ng::from_str(content)?
        };

        if let Some(path) = &config_path {
            debug!("Loaded configuration from {}", path);
        }

        Ok(Self {
            config,
            config_path,
        })
    }

    /// Name of the managed service
    pub fn service(&self) -> &str {
        self.config.service.as_deref().unwrap_or(DEFAULT_SERVICE)
    }

    /// Prefix used when generating archive names
    pub fn filename_prefix(&self) -> &str {
        self.config
            .filename_prefix
            .as_deref()
            .unwrap_or(DEFAULT_FILENAME_PREFIX)
    }

    /// Directories listed in the configuration file, if any
    pub fn directories(&self) -> Option<&[String]> {
        self.config.directories.as_deref()
    }

    /// Pick the directories to use: an explicit override first, then the
    /// configuration file. `None` means the built-in defaults apply.
    pub fn requested_directories(&self, overrides: Option<Vec<String>>) -> Option<Vec<String>> {
        overrides.or_else(|| self.directories().map(|d| d.to_vec()))
    }
}
