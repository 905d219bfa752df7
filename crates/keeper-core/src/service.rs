//! Managed service status
//!
//! Backups and restores must never run against a live service, so keeper asks
//! the host service manager whether the service is running before doing any
//! work. [`ServiceStatus`] is the seam used for that question; tests provide
//! their own implementation.

use crate::error::{Error, Result};
use std::process::Command;
use tracing::debug;

/// Service whose data directories are backed up by default.
pub const DEFAULT_SERVICE: &str = "rundeckd";

/// Answers whether the managed service is currently running.
pub trait ServiceStatus {
    /// Name of the managed service, used in error messages.
    fn service_name(&self) -> &str;

    /// Returns `true` when the service is running.
    fn is_running(&self) -> Result<bool>;
}

/// Queries the service through `service <name> status`.
#[derive(Debug, Clone)]
pub struct ServiceCommand {
    name: String,
    program: String,
}

impl ServiceCommand {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            program: "service".to_string(),
        }
    }

    /// Use a different service manager executable (it receives `<name> status`).
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }
}

impl Default for ServiceCommand {
    fn default() -> Self {
        Self::new(DEFAULT_SERVICE)
    }
}

impl ServiceStatus for ServiceCommand {
    fn service_name(&self) -> &str {
        &self.name
    }

    fn is_running(&self) -> Result<bool> {
        debug!("Querying status: {} {} status", self.program, self.name);

        let output = Command::new(&self.program)
            .args([self.name.as_str(), "status"])
            .output()
            .map_err(|e| {
                Error::service_query(
                    &self.name,
                    format!("could not run '{}': {}", self.program, e),
                )
            })?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        parse_status(&self.name, output.status.success(), &text)
    }
}

/// Interpret the output of a status query.
///
/// A failed query only counts as an answer when its output mentions the
/// service; anything else means the status could not be determined.
pub fn parse_status(service: &str, success: bool, output: &str) -> Result<bool> {
    if !success && !output.contains(service) {
        return Err(Error::service_query(
            service,
            format!(
                "status command failed, is {} installed on this machine? output: {}",
                service,
                output.trim()
            ),
        ));
    }

    let running = reports_running(service, output);
    debug!("{} running: {}", service, running);
    Ok(running)
}

/// Phrases that say a service is stopped even though they contain "running".
const STOPPED_MARKERS: &[&str] = &["not running", "inactive"];

/// The output names the service and says it is running, e.g.
/// `rundeckd (pid 4242) is running...` or systemd's `Active: active (running)`.
fn reports_running(service: &str, output: &str) -> bool {
    let text = output.to_lowercase();
    text.contains(&service.to_lowercase())
        && text.contains("running")
        && !STOPPED_MARKERS.iter().any(|marker| text.contains(marker))
}
