//! Command-line entry point for the docker app updater.
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use docker_app_updater::cli::{Cli, Command};
use docker_app_updater::{commands, logging};

fn main() -> Result<ExitCode> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();
    let command = args.subcommand();

    if command == Command::Version {
        commands::version::run();
        return Ok(ExitCode::SUCCESS);
    }

    let level = logging::init_subscriber(args.verbose, command.log_name());
    let log = Arc::new(logging::Logger::new(command.log_name()));

    if command == Command::Config {
        commands::config::run(&args.global, &*log, &level)?;
        return Ok(ExitCode::SUCCESS);
    }
    commands::update::run(&args.global, &log, &level)
}
