//! Update orchestration: per-app pipelines on a bounded pool, then the
//! global post-update phase.
//!
//! Each app's pipeline is `refresh_commands` followed by the app's own
//! `after_commands`. Pipelines run on a [`WorkerPool`] of `max_threads`
//! workers and stop at their first failing command without affecting other
//! apps. Once every pipeline has finished, the global `after_commands` run
//! one at a time on the calling thread and their output is printed.
pub mod command;
mod context;
pub mod pool;
pub mod report;

use std::io::Write;
use std::sync::Arc;
use std::time::Instant;

pub use context::Context;
pub use pool::WorkerPool;
pub use report::{AppOutcome, AppStatus, PostUpdateOutcome, UpdateReport};

use crate::config::{App, Command, Config};
use crate::error::UpdaterError;
use crate::logging::{BufferedLog, Log, Logger, TaskStatus};

/// Label used for `{{app.name}}` and log lines in the post-update phase.
pub const POST_UPDATE_LABEL: &str = "POST-UPDATE";

/// Banner printed before the post-update output.
pub const SEPARATOR: &str = "****************************************************************";

/// The commands run for `app`, in order.
pub fn pipeline<'a>(config: &'a Config, app: &'a App) -> impl Iterator<Item = &'a Command> {
    config.refresh_commands.iter().chain(&app.after_commands)
}

/// Update every configured app, then run the post-update commands.
///
/// App output is buffered per app and written through `logger` when the
/// app finishes. Post-update command output goes to `out`.
///
/// # Errors
///
/// Returns [`UpdaterError::Pool`] if the worker pool cannot be built.
/// Command failures are reported in the returned [`UpdateReport`].
pub fn run(
    ctx: &Context,
    logger: &Arc<Logger>,
    out: &mut dyn Write,
) -> Result<UpdateReport, UpdaterError> {
    let pool = WorkerPool::new(ctx.config.max_threads)?;
    ctx.log.stage(&format!(
        "Updating {} app(s) with {} worker(s)",
        ctx.config.apps.len(),
        pool.size()
    ));

    let apps = pool.run_all(&ctx.config.apps, |app| {
        let buffered = Arc::new(BufferedLog::new(Arc::clone(logger)));
        let app_ctx = ctx.with_log(Arc::clone(&buffered) as Arc<dyn Log>);
        let outcome = update_app(&app_ctx, app);
        buffered.flush();
        outcome
    });

    let post_update = run_post_update(ctx, out);
    Ok(UpdateReport { apps, post_update })
}

/// Run one app's pipeline, stopping at the first failure.
fn update_app(ctx: &Context, app: &App) -> AppOutcome {
    let started = Instant::now();
    ctx.log.debug(&format!("[{}] starting update in {}", app.name, app.path));

    let mut commands_run = 0;
    for cmd in pipeline(&ctx.config, app) {
        commands_run += 1;
        if let Err(error) = command::execute(ctx, cmd, &app.path, &app.name) {
            ctx.log.error(&format!("[{}] {error}", app.name));
            let line = command::display_command(cmd);
            ctx.log
                .record_task(&app.name, TaskStatus::Failed, Some(line.as_str()));
            return AppOutcome {
                name: app.name.clone(),
                status: AppStatus::Failed {
                    command: line,
                    error,
                },
                commands_run,
                elapsed: started.elapsed(),
            };
        }
    }

    let elapsed = started.elapsed();
    let status = if ctx.dry_run() {
        ctx.log.record_task(&app.name, TaskStatus::DryRun, None);
        AppStatus::DryRun
    } else {
        ctx.log
            .info(&format!("[{}] updated after {elapsed:.2?}", app.name));
        let took = format!("{elapsed:.2?}");
        ctx.log
            .record_task(&app.name, TaskStatus::Ok, Some(took.as_str()));
        AppStatus::Updated
    };

    AppOutcome {
        name: app.name.clone(),
        status,
        commands_run,
        elapsed,
    }
}

/// Run the global post-update commands in order, stopping at the first
/// failure.
fn run_post_update(ctx: &Context, out: &mut dyn Write) -> PostUpdateOutcome {
    let commands = &ctx.config.after_commands;
    if commands.is_empty() {
        return PostUpdateOutcome::Skipped;
    }

    writeln!(out, "{SEPARATOR}").ok();
    for (index, cmd) in commands.iter().enumerate() {
        let line = command::display_command(cmd);
        match command::execute(ctx, cmd, "", POST_UPDATE_LABEL) {
            Ok(output) => {
                write!(out, "{}", format_block(&line, &output)).ok();
            }
            Err(error) => {
                ctx.log
                    .error(&format!("[{POST_UPDATE_LABEL}]\n$ {line}\n{error}"));
                return PostUpdateOutcome::Failed {
                    command: line,
                    error,
                    skipped: commands.len() - index - 1,
                };
            }
        }
    }
    out.flush().ok();

    PostUpdateOutcome::Completed {
        commands: commands.len(),
    }
}

/// Format one post-update command and its output for the operator.
///
/// Empty output still gets one blank indented line.
fn format_block(line: &str, output: &str) -> String {
    let mut block = format!("[{POST_UPDATE_LABEL}]\n$ {line}\n");
    let output = output.trim_end();
    if output.is_empty() {
        block.push_str("  \n");
        return block;
    }
    for text in output.lines() {
        block.push_str("  ");
        block.push_str(text);
        block.push('\n');
    }
    block
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::exec::{ExecResult, MockExecutor};
    use std::path::Path;

    fn cmd(parts: &[&str]) -> Command {
        parts.iter().map(ToString::to_string).collect()
    }

    fn app(name: &str, after: Vec<Command>) -> App {
        App {
            name: name.to_string(),
            path: format!("/srv/{name}"),
            after_commands: after,
        }
    }

    fn ok(output: &str) -> std::io::Result<ExecResult> {
        Ok(ExecResult {
            output: output.to_string(),
            success: true,
            code: Some(0),
        })
    }

    fn failed(output: &str) -> std::io::Result<ExecResult> {
        Ok(ExecResult {
            output: output.to_string(),
            success: false,
            code: Some(1),
        })
    }

    fn run_with(config: Config, executor: MockExecutor) -> (UpdateReport, Arc<Logger>, String) {
        let logger = Arc::new(Logger::with_log_file(None));
        let ctx = Context::new(
            Arc::new(config),
            Arc::clone(&logger) as Arc<dyn Log>,
            Arc::new(executor),
        )
        .with_home("/home/ops");
        let mut out = Vec::new();
        let report = run(&ctx, &logger, &mut out).unwrap();
        (report, logger, String::from_utf8(out).unwrap())
    }

    #[test]
    fn pipeline_is_refresh_then_app_commands() {
        let config = Config {
            refresh_commands: vec![cmd(&["pull"]), cmd(&["up"])],
            ..Config::default()
        };
        let app = app("web", vec![cmd(&["prune"])]);
        let programs: Vec<_> = pipeline(&config, &app).map(|c| c[0].as_str()).collect();
        assert_eq!(programs, ["pull", "up", "prune"]);
    }

    #[test]
    fn failing_command_short_circuits_only_its_app() {
        let config = Config {
            refresh_commands: vec![cmd(&["pull"]), cmd(&["up"])],
            apps: vec![app("broken", vec![cmd(&["never"])]), app("web", Vec::new())],
            ..Config::default()
        };
        let mut executor = MockExecutor::new();
        executor
            .expect_run()
            .withf(|program, _, dir| program == "pull" && dir == Path::new("/srv/broken"))
            .times(1)
            .returning(|_, _, _| failed("denied\n"));
        executor
            .expect_run()
            .withf(|program, _, _| program == "never")
            .never();
        executor
            .expect_run()
            .withf(|_, _, dir| dir == Path::new("/srv/web"))
            .times(2)
            .returning(|_, _, _| ok(""));

        let (report, logger, out) = run_with(config, executor);

        assert_eq!(report.apps[0].name, "broken");
        assert_eq!(report.apps[0].commands_run, 1);
        match &report.apps[0].status {
            AppStatus::Failed { command, error } => {
                assert_eq!(command, "pull");
                assert_eq!(error.output, "denied\n");
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert_eq!(report.apps[1].status, AppStatus::Updated);
        assert_eq!(report.apps[1].commands_run, 2);
        assert_eq!(report.post_update, PostUpdateOutcome::Skipped);
        assert!(report.has_failures());
        assert_eq!(
            logger
                .task_entries()
                .iter()
                .filter(|t| t.status == TaskStatus::Failed)
                .count(),
            1
        );
        assert!(out.is_empty(), "no separator without post-update commands");
    }

    #[test]
    fn dry_run_spawns_nothing() {
        let config = Config {
            dry_run: true,
            apps: vec![app("web", vec![cmd(&["prune"])]), app("db", Vec::new())],
            after_commands: vec![cmd(&["docker", "image", "prune"])],
            ..Config::default()
        };
        let mut executor = MockExecutor::new();
        executor.expect_run().never();

        let (report, logger, out) = run_with(config, executor);

        assert!(report.apps.iter().all(|a| a.status == AppStatus::DryRun));
        assert_eq!(report.post_update, PostUpdateOutcome::Completed { commands: 1 });
        assert!(
            logger
                .task_entries()
                .iter()
                .all(|t| t.status == TaskStatus::DryRun)
        );
        assert!(out.contains("$ docker image prune\n  ***DRY RUN***\n"));
    }

    #[test]
    fn post_update_runs_in_order_and_prints_output() {
        let config = Config {
            apps: Vec::new(),
            after_commands: vec![cmd(&["first", "{{app.name}}"]), cmd(&["second"])],
            ..Config::default()
        };
        let mut executor = MockExecutor::new();
        let mut seq = mockall::Sequence::new();
        executor
            .expect_run()
            .withf(|program, args, dir| {
                program == "first" && args == ["POST-UPDATE"] && dir == Path::new("")
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| ok("line one\nline two\n\n"));
        executor
            .expect_run()
            .withf(|program, _, _| program == "second")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| ok(""));

        let (report, _logger, out) = run_with(config, executor);

        assert_eq!(report.post_update, PostUpdateOutcome::Completed { commands: 2 });
        assert_eq!(
            out,
            format!(
                "{SEPARATOR}\n\
                 [POST-UPDATE]\n$ first {{{{app.name}}}}\n  line one\n  line two\n\
                 [POST-UPDATE]\n$ second\n  \n"
            )
        );
    }

    #[test]
    fn post_update_stops_at_first_failure() {
        let config = Config {
            apps: Vec::new(),
            after_commands: vec![cmd(&["one"]), cmd(&["two"]), cmd(&["three"])],
            ..Config::default()
        };
        let mut executor = MockExecutor::new();
        executor
            .expect_run()
            .withf(|program, _, _| program == "one")
            .returning(|_, _, _| ok("done\n"));
        executor
            .expect_run()
            .withf(|program, _, _| program == "two")
            .returning(|_, _, _| failed("boom\n"));
        executor
            .expect_run()
            .withf(|program, _, _| program == "three")
            .never();

        let (report, _logger, out) = run_with(config, executor);

        match report.post_update {
            PostUpdateOutcome::Failed {
                command, skipped, ..
            } => {
                assert_eq!(command, "two");
                assert_eq!(skipped, 1);
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(out.contains("$ one\n  done\n"));
        assert!(!out.contains("$ two"));
    }

    #[test]
    fn post_update_failure_is_logged_with_its_command_line() {
        let (log, _tmp, _guard) = crate::logging::isolated_logger();
        let logger = Arc::new(log);
        let config = Config {
            apps: Vec::new(),
            after_commands: vec![cmd(&["docker", "image", "prune"])],
            ..Config::default()
        };
        let mut executor = MockExecutor::new();
        executor.expect_run().returning(|_, _, _| failed("denied\n"));
        let ctx = Context::new(
            Arc::new(config),
            Arc::clone(&logger) as Arc<dyn Log>,
            Arc::new(executor),
        );

        let mut out = Vec::new();
        run(&ctx, &logger, &mut out).unwrap();

        let contents = std::fs::read_to_string(logger.log_path().unwrap()).unwrap();
        assert!(
            contents.contains(
                "[error] [POST-UPDATE]\n$ docker image prune\n\
                 failed to run docker image prune: exit status 1 - denied\\n"
            ),
            "log: {contents}"
        );
    }

    #[test]
    fn format_block_indents_trimmed_output() {
        assert_eq!(
            format_block("echo hi", "hi\nthere\n\n"),
            "[POST-UPDATE]\n$ echo hi\n  hi\n  there\n"
        );
        assert_eq!(format_block("true", ""), "[POST-UPDATE]\n$ true\n  \n");
        assert_eq!(format_block("true", "\n\n"), "[POST-UPDATE]\n$ true\n  \n");
    }

    #[test]
    fn successful_apps_record_elapsed_time() {
        let config = Config {
            refresh_commands: vec![cmd(&["pull"])],
            apps: vec![app("web", Vec::new())],
            ..Config::default()
        };
        let mut executor = MockExecutor::new();
        executor.expect_run().times(1).returning(|_, _, _| ok(""));

        let (report, logger, _out) = run_with(config, executor);

        assert_eq!(report.apps[0].status, AppStatus::Updated);
        let entries = logger.task_entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].status, TaskStatus::Ok);
        assert!(entries[0].message.is_some());
    }
}
