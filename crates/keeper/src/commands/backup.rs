//! Backup command

use anyhow::{bail, Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::Local;
use clap::Args;
use keeper_backup::{backup_filename, check_preconditions, BackupRestoreService};

use super::RunContext;
use crate::output;

#[derive(Args, Debug)]
pub struct BackupArgs {
    /// Directory to write the archive into (created if missing)
    #[arg(long)]
    pub dest: Utf8PathBuf,

    /// Archive file name (defaults to a timestamped name)
    #[arg(long)]
    pub filename: Option<String>,

    /// Back up even if the service is running
    #[arg(long)]
    pub ignore_running: bool,
}

pub fn run(args: BackupArgs, ctx: &RunContext) -> Result<()> {
    output::header("Backup");

    if let Some(dirs) = &ctx.dir_overrides {
        ensure_directories_exist(dirs)?;
    }

    let directories = check_preconditions(
        &ctx.service_status(),
        ctx.requested_directories(),
        args.ignore_running,
    )?;

    let filename = args.filename.unwrap_or_else(|| {
        backup_filename(ctx.config.filename_prefix(), ctx.is_partial(), &Local::now())
    });

    output::kv("Directories", &directories.to_string());
    output::kv("Destination", args.dest.as_str());
    output::kv("Filename", &filename);

    let service = BackupRestoreService::new(directories).with_observer(ctx.observer());
    let result = service
        .backup(args.dest.as_std_path(), &filename)
        .with_context(|| format!("Failed to create backup in {}", args.dest))?;

    for skipped in &result.skipped_directories {
        output::warning(&format!("Skipped missing directory {}", skipped));
    }

    output::success("Backup complete");
    output::kv("Archive", &result.archive_path.display().to_string());
    output::kv("Files", &result.file_count.to_string());
    output::kv("Size", &output::format_bytes(result.size_bytes));
    output::kv("Duration", &output::format_duration(result.duration));

    Ok(())
}

/// Every directory named with `--dirs` must exist before a backup starts.
fn ensure_directories_exist(dirs: &[String]) -> Result<()> {
    for dir in dirs {
        if !Utf8Path::new(dir).is_dir() {
            bail!("Directory {} does not exist", dir);
        }
    }
    Ok(())
}
