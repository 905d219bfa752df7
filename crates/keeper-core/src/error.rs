//! Error types for keeper-core

use thiserror::Error;

/// Result type alias using keeper-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for keeper
#[derive(Error, Debug)]
pub enum Error {
    /// The managed service is running
    #[error("{service} is still running; stop it before taking a backup or restoring from one")]
    ServiceActive { service: String },

    /// The service status query failed unexpectedly
    #[error("Failed to query status of {service}: {message}")]
    ServiceQuery { service: String, message: String },

    /// Invalid directory set or other configuration problem
    #[error("Invalid configuration: {message}")]
    Configuration { message: String },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a service active error
    pub fn service_active(service: impl Into<String>) -> Self {
        Self::ServiceActive {
            service: service.into(),
        }
    }

    /// Create a service query error
    pub fn service_query(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ServiceQuery {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a config not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }
}
