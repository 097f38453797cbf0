//! Results of an update run.
use std::time::Duration;

use crate::error::CommandError;

/// How one app's pipeline ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppStatus {
    /// Every command exited zero.
    Updated,
    /// Commands were only logged.
    DryRun,
    /// A command failed; the rest of the pipeline was skipped.
    Failed {
        /// Space-joined command line that failed, as configured.
        command: String,
        /// The failure.
        error: CommandError,
    },
}

/// Outcome of one app's pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppOutcome {
    /// App name.
    pub name: String,
    /// Final status.
    pub status: AppStatus,
    /// Number of commands started, including a failing one.
    pub commands_run: usize,
    /// Wall-clock time spent on the pipeline.
    pub elapsed: Duration,
}

impl AppOutcome {
    /// Whether the pipeline failed.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self.status, AppStatus::Failed { .. })
    }
}

/// Outcome of the global post-update phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostUpdateOutcome {
    /// No post-update commands were configured.
    Skipped,
    /// Every post-update command ran.
    Completed {
        /// Number of commands run.
        commands: usize,
    },
    /// A post-update command failed; later ones were not run.
    Failed {
        /// Space-joined command line that failed.
        command: String,
        /// The failure.
        error: CommandError,
        /// Number of commands left unrun.
        skipped: usize,
    },
}

/// Everything an update run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateReport {
    /// Per-app outcomes, in configuration order.
    pub apps: Vec<AppOutcome>,
    /// Post-update phase outcome.
    pub post_update: PostUpdateOutcome,
}

impl UpdateReport {
    /// Apps whose pipeline failed.
    pub fn failed_apps(&self) -> impl Iterator<Item = &AppOutcome> {
        self.apps.iter().filter(|a| a.is_failed())
    }

    /// Whether any app or post-update command failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failed_apps().next().is_some()
            || matches!(self.post_update, PostUpdateOutcome::Failed { .. })
    }
}
