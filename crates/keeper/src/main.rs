//! keeper CLI - backup and restore for service-managed directories
//!
//! This is the main entry point for the keeper command-line interface.

mod cli;
mod commands;
mod output;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};
use commands::RunContext;

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.debug, cli.quiet);

    let ctx = RunContext::load(
        cli.config.as_deref(),
        cli.dir_overrides(),
        !cli.no_progress && !cli.quiet,
    )?;

    match cli.command {
        Commands::Backup(args) => commands::backup::run(args, &ctx),
        Commands::Restore(args) => commands::restore::run(args, &ctx),
    }
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(debug: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
