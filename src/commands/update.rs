//! Command: update every app, then run the post-update commands.
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context as _, Result};

use super::CommandSetup;
use super::version::version;
use crate::cli::GlobalOpts;
use crate::exec::SystemExecutor;
use crate::logging::{LevelHandle, Log, Logger};
use crate::update::{self, Context, PostUpdateOutcome, UpdateReport};

/// Run the update command.
///
/// Exits successfully even when apps fail unless `--strict` is set.
///
/// # Errors
///
/// Returns an error if the worker pool cannot be started.
pub fn run(global: &GlobalOpts, log: &Arc<Logger>, level: &LevelHandle) -> Result<ExitCode> {
    log.info(&format!("{} {}", crate::APP_NAME, version()));

    let setup = CommandSetup::init(global, &**log, level);
    let ctx = Context::new(
        Arc::new(setup.config),
        Arc::clone(log) as Arc<dyn Log>,
        Arc::new(SystemExecutor),
    );

    let mut stdout = std::io::stdout();
    let report = update::run(&ctx, log, &mut stdout).context("running app updates")?;

    log.print_summary();
    log_post_update(&report, &**log);

    Ok(exit_code(&report, global.strict, &**log))
}

fn log_post_update(report: &UpdateReport, log: &dyn Log) {
    match &report.post_update {
        PostUpdateOutcome::Skipped => log.debug("no post-update commands configured"),
        PostUpdateOutcome::Completed { commands } => {
            log.info(&format!("post-update: {commands} command(s) completed"));
        }
        PostUpdateOutcome::Failed {
            command, skipped, ..
        } => log.error(&format!(
            "post-update: `{command}` failed, {skipped} command(s) skipped"
        )),
    }
}

/// Exit status for a finished run.
fn exit_code(report: &UpdateReport, strict: bool, log: &dyn Log) -> ExitCode {
    if strict && report.has_failures() {
        log.error("one or more commands failed (--strict)");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
