//! Backup file naming.
//!
//! Generated names look like `rundeck-backup-2024-03-05--14-07-09.tar.gz`.
//! Backups of an overridden directory list carry a `partial-` marker
//! (`rundeck-backup-partial-2024-...`) so operators can tell them apart from
//! full system backups.

use chrono::{DateTime, TimeZone};
use std::fmt::Display;

/// File extension of keeper archives
pub const ARCHIVE_EXTENSION: &str = ".tar.gz";

/// Marker inserted into the name of partial backups
pub const PARTIAL_MARKER: &str = "partial-";

/// chrono format of the timestamp embedded in generated names
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d--%H-%M-%S";

/// Build the default archive name for a backup taken at `time`.
pub fn backup_filename<Tz>(prefix: &str, partial: bool, time: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!(
        "{}{}{}{}",
        prefix,
        if partial { PARTIAL_MARKER } else { "" },
        time.format(TIMESTAMP_FORMAT),
        ARCHIVE_EXTENSION
    )
}
