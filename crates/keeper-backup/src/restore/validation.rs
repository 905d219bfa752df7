//! Entry path validation for restore operations

use crate::error::{Error, Result};
use std::path::{Component, Path};

/// Rejects entry names that would escape the restore root.
///
/// Archives written by keeper only hold relative names without `..`;
/// anything else was produced elsewhere and is refused.
pub fn validate_entry_path(path: &Path) -> Result<()> {
    let unsafe_component = path.components().any(|component| {
        matches!(
            component,
            Component::RootDir | Component::Prefix(_) | Component::ParentDir
        )
    });

    if unsafe_component || path.as_os_str().is_empty() {
        return Err(Error::unsafe_entry_path(path.display().to_string()));
    }

    Ok(())
}
