//! # keeper-core
//!
//! Core library for the keeper CLI providing:
//! - Configuration file parsing (keeper.yaml)
//! - The validated directory set shared by backup and restore
//! - The service-status collaborator used to refuse work on a live service

pub mod config;
pub mod directories;
pub mod error;
pub mod service;

pub use config::{KeeperConfig, KeeperConfigFile};
pub use directories::{DirectorySet, DEFAULT_DIRECTORIES};
pub use error::{Error, Result};
pub use service::{ServiceCommand, ServiceStatus, DEFAULT_SERVICE};
