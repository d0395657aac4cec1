//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Keep external asset repositories in a project tree at their declared revisions
#[derive(Parser, Debug)]
#[command(name = "assets")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project root that asset paths are relative to [default: current directory]
    #[arg(long, global = true, env = "ASSETS_ROOT")]
    pub root: Option<PathBuf>,

    /// Asset configuration file [default: assets.toml in the project root]
    #[arg(short, long, global = true, env = "ASSETS_CONFIG")]
    pub config: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Clone, update or check out every asset, then run generation targets
    ///
    /// Examples:
    ///   assets sync                  # All assets
    ///   assets sync assets/docs      # Only the asset at assets/docs
    Sync {
        /// Restrict to the assets at these paths
        paths: Vec<PathBuf>,
    },

    /// Remove every asset checkout
    Clean,

    /// Show what each asset needs without changing anything
    Status {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Print the units of work a command would run
    Plan {
        /// Plan removal instead of synchronization
        #[arg(long)]
        clean: bool,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}
