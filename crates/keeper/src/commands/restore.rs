//! Restore command
//!
//! Connects the CLI to the keeper-backup restore engine.

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::Args;
use keeper_backup::{check_preconditions, BackupRestoreService, DEFAULT_RESTORE_ROOT};

use super::RunContext;
use crate::output;

#[derive(Args, Debug)]
pub struct RestoreArgs {
    /// Archive to restore from
    #[arg(short, long)]
    pub file: Utf8PathBuf,

    /// Directory the archive entries are restored under
    #[arg(long, default_value = DEFAULT_RESTORE_ROOT)]
    pub root: Utf8PathBuf,
}

pub fn run(args: RestoreArgs, ctx: &RunContext) -> Result<()> {
    output::header("Restore");

    let directories = check_preconditions(&ctx.service_status(), ctx.requested_directories(), false)?;

    output::kv("Archive", args.file.as_str());
    output::kv("Directories", &directories.to_string());
    output::kv("Root", args.root.as_str());

    let service = BackupRestoreService::new(directories)
        .with_observer(ctx.observer())
        .with_restore_root(args.root.as_std_path());

    let result = service
        .restore(args.file.as_std_path())
        .with_context(|| format!("Failed to restore from {}", args.file))?;

    output::success("Restore complete");
    output::kv("Files restored", &result.restored.to_string());
    output::kv("Entries skipped", &result.skipped.to_string());
    output::kv("Duration", &output::format_duration(result.duration));

    Ok(())
}
