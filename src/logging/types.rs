//! Core logging types: run entries, status, and the [`Log`] trait.

/// Per-app result for summary reporting.
#[derive(Debug, Clone)]
pub struct TaskEntry {
    /// App name.
    pub name: String,
    /// Final status of the app's pipeline.
    pub status: TaskStatus,
    /// Optional detail message (elapsed time or failure reason).
    pub message: Option<String>,
}

/// Terminal status of an app pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Every command in the pipeline succeeded.
    Ok,
    /// The pipeline ran in dry-run mode; nothing was spawned.
    DryRun,
    /// A command failed and the rest of the pipeline was skipped.
    Failed,
}

/// Abstraction over logging backends.
///
/// Both [`Logger`](super::logger::Logger) (direct output) and
/// [`BufferedLog`](super::buffered::BufferedLog) (deferred output for
/// parallel app pipelines) implement this trait, so pipeline code can log
/// without knowing whether output is immediate or buffered.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (suppressed unless the level allows it).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a dry-run action message.
    fn dry_run(&self, msg: &str);
    /// Record an app result for the summary.
    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>);
}
