//! Configuration loading

mod loader;

pub use loader::{KeeperConfig, KeeperConfigFile, CONFIG_FILE_NAMES};
