//! Asset synchronization CLI
//!
//! The command-line front end for keeping external asset repositories in a
//! project tree at their declared branch or revision.

mod cli;
mod commands;
mod context;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use context::ProjectContext;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: logging disabled: {e}", "warning".yellow().bold());
    }
    if cli.verbose {
        tracing::debug!("verbose mode enabled");
    }

    let ctx = ProjectContext::resolve(cli.root.as_deref(), cli.config.as_deref())?;
    execute_command(&ctx, cli.command)
}

fn execute_command(ctx: &ProjectContext, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Sync { paths } => commands::run_sync(ctx, &paths),
        Commands::Clean => commands::run_clean(ctx),
        Commands::Status { json } => commands::run_status(ctx, json),
        Commands::Plan { clean, json } => commands::run_plan(ctx, clean, json),
    }
}
