//! Structured logger with dry-run awareness and summary collection.
use std::path::PathBuf;
use std::sync::Mutex;

use super::types::{Log, TaskEntry, TaskStatus};
use super::utils::log_file_path;

/// Implement the display methods of [`Log`] by delegating to inherent methods
/// of the same name on the implementing type.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Structured logger with dry-run awareness and summary collection.
///
/// Every message goes through [`tracing`]; the subscriber installed by
/// [`init_subscriber`](super::subscriber::init_subscriber) decides where it
/// lands. The logger itself only remembers per-app results for the summary
/// and the log file path to point the operator at.
#[derive(Debug)]
pub struct Logger {
    tasks: Mutex<Vec<TaskEntry>>,
    log_file: Option<PathBuf>,
    /// Serializes replays of buffered app output.
    pub(super) flush_lock: Mutex<()>,
}

impl Logger {
    /// Create a logger for `command`, pointing at its default log file.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self::with_log_file(log_file_path(command))
    }

    /// Create a logger that reports `log_file` (if any) in the summary.
    #[must_use]
    pub const fn with_log_file(log_file: Option<PathBuf>) -> Self {
        Self {
            tasks: Mutex::new(Vec::new()),
            log_file,
            flush_lock: Mutex::new(()),
        }
    }

    /// Return the log file path, if available.
    #[must_use]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Return a clone of all recorded entries.
    #[must_use]
    pub fn task_entries(&self) -> Vec<TaskEntry> {
        self.tasks.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: "docker_app_updater::stage", "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message.
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a dry-run action message.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: "docker_app_updater::dry_run", "{msg}");
    }

    /// Record an app result for the summary.
    pub fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.tasks.lock() {
            guard.push(TaskEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Log the summary of all recorded app results.
    pub fn print_summary(&self) {
        let mut tasks = self.task_entries();
        if tasks.is_empty() {
            return;
        }
        tasks.sort_by(|a, b| a.name.cmp(&b.name));

        self.stage("Summary");

        let mut ok = 0u32;
        let mut dry_run = 0u32;
        let mut failed = 0u32;

        for task in &tasks {
            let (icon, color) = match task.status {
                TaskStatus::Ok => {
                    ok += 1;
                    ("✓", "\x1b[32m")
                }
                TaskStatus::DryRun => {
                    dry_run += 1;
                    ("~", "\x1b[37m")
                }
                TaskStatus::Failed => {
                    failed += 1;
                    ("✗", "\x1b[31m")
                }
            };

            let suffix = task
                .message
                .as_ref()
                .map_or_else(String::new, |msg| format!(" ({msg})"));

            self.info(&format!("{color}{icon} {}{suffix}\x1b[0m", task.name));
        }

        let total = ok + dry_run + failed;
        self.info(&format!(
            "{total} apps: \x1b[32m{ok} ok\x1b[0m, \x1b[37m{dry_run} dry-run\x1b[0m, \x1b[31m{failed} failed\x1b[0m"
        ));

        if let Some(path) = &self.log_file {
            self.info(&format!("\x1b[2mlog: {}\x1b[0m", path.display()));
        }
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error, dry_run);

    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        self.record_task(name, status, message);
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::isolated_logger;
    use std::fs;

    #[test]
    fn logger_new() {
        let (log, _tmp, _guard) = isolated_logger();
        assert!(log.task_entries().is_empty(), "expected empty task list");
    }

    #[test]
    fn record_task_ok() {
        let (log, _tmp, _guard) = isolated_logger();
        log.record_task("nextcloud", TaskStatus::Ok, None);
        let tasks = log.task_entries();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].name, "nextcloud");
        assert_eq!(tasks[0].status, TaskStatus::Ok);
    }

    #[test]
    fn record_task_with_message() {
        let (log, _tmp, _guard) = isolated_logger();
        log.record_task("gitea", TaskStatus::Failed, Some("exit status 1"));
        assert_eq!(
            log.task_entries()[0].message,
            Some("exit status 1".to_string())
        );
    }

    #[test]
    fn entries_keep_every_status() {
        let (log, _tmp, _guard) = isolated_logger();
        log.record_task("a", TaskStatus::Ok, None);
        log.record_task("b", TaskStatus::Failed, Some("error 1"));
        log.record_task("c", TaskStatus::DryRun, None);
        let statuses: Vec<_> = log.task_entries().iter().map(|t| t.status).collect();
        assert_eq!(
            statuses,
            [TaskStatus::Ok, TaskStatus::Failed, TaskStatus::DryRun]
        );
    }

    #[test]
    fn log_trait_delegates_to_logger() {
        let (log, _tmp, _guard) = isolated_logger();
        let log_ref: &dyn Log = &log;
        log_ref.record_task("via-trait", TaskStatus::Ok, None);
        assert_eq!(log.task_entries().len(), 1);
    }

    #[test]
    fn messages_written_to_file_with_tags() {
        let (log, _tmp, _guard) = isolated_logger();
        let pid = std::process::id();
        log.info(&format!("info-marker-{pid}"));
        log.warn(&format!("warn-marker-{pid}"));
        log.error(&format!("error-marker-{pid}"));
        log.dry_run(&format!("dryrun-marker-{pid}"));
        log.stage(&format!("stage-marker-{pid}"));
        let contents = fs::read_to_string(log.log_path().expect("log path")).unwrap();
        assert!(contents.contains(&format!("info-marker-{pid}")));
        assert!(contents.contains(&format!("[warn] warn-marker-{pid}")));
        assert!(contents.contains(&format!("[error] error-marker-{pid}")));
        assert!(contents.contains(&format!("[dry run] dryrun-marker-{pid}")));
        assert!(contents.contains(&format!("==> stage-marker-{pid}")));
    }

    #[test]
    fn debug_written_to_file() {
        let (log, _tmp, _guard) = isolated_logger();
        let marker = format!("debug-marker-{}", std::process::id());
        log.debug(&marker);
        let contents = fs::read_to_string(log.log_path().expect("log path")).unwrap();
        assert!(contents.contains(&format!("[debug] {marker}")));
    }

    #[test]
    fn summary_lists_every_app_and_totals() {
        let (log, _tmp, _guard) = isolated_logger();
        log.record_task("zulu", TaskStatus::Ok, Some("1.2s"));
        log.record_task("alpha", TaskStatus::Failed, Some("docker compose pull"));
        log.print_summary();
        let contents = fs::read_to_string(log.log_path().expect("log path")).unwrap();
        let alpha = contents.find("✗ alpha (docker compose pull)").expect("alpha line");
        let zulu = contents.find("✓ zulu (1.2s)").expect("zulu line");
        assert!(alpha < zulu, "summary should be sorted by app name");
        assert!(contents.contains("2 apps: 1 ok, 0 dry-run, 1 failed"));
    }

    #[test]
    fn summary_skipped_when_nothing_recorded() {
        let (log, _tmp, _guard) = isolated_logger();
        log.print_summary();
        let contents = fs::read_to_string(log.log_path().expect("log path")).unwrap();
        assert!(!contents.contains("Summary"));
    }
}
