//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI entry point for the app updater.
#[derive(Parser, Debug)]
#[command(
    name = "docker-app-updater",
    about = "Refresh docker compose apps with bounded parallelism",
    version
)]
pub struct Cli {
    /// Subcommand to run; `update` when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

impl Cli {
    /// The subcommand to run, defaulting to [`Command::Update`].
    #[must_use]
    pub fn subcommand(&self) -> Command {
        self.command.unwrap_or_default()
    }
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Config file to use instead of `CONFIG_FILE` and the search paths
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log commands instead of running them
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Exit with status 1 when any app or post-update command fails
    #[arg(long, global = true)]
    pub strict: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Command {
    /// Update every configured app, then run the post-update commands
    #[default]
    Update,
    /// Print the effective configuration as JSON
    Config,
    /// Print version information
    Version,
}

impl Command {
    /// Name used for this command's log file.
    #[must_use]
    pub const fn log_name(self) -> &'static str {
        match self {
            Self::Update => "update",
            Self::Config => "config",
            Self::Version => "version",
        }
    }
}
