use std::sync::Arc;

use crate::config::Config;
use crate::exec::Executor;
use crate::logging::Log;

/// Shared, read-only state for one update run.
pub struct Context {
    /// Effective configuration, loaded once before any worker starts.
    pub config: Arc<Config>,
    /// Logger for output and result recording.
    pub log: Arc<dyn Log>,
    /// Process launcher (real or mocked).
    pub executor: Arc<dyn Executor>,
    /// Value substituted for `{{HOME}}`; empty when `HOME` is unset.
    pub home: String,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("config", &self.config)
            .field("log", &"<dyn Log>")
            .field("executor", &"<dyn Executor>")
            .field("home", &self.home)
            .finish()
    }
}

impl Context {
    /// Create a context, reading `HOME` from the process environment.
    #[must_use]
    pub fn new(config: Arc<Config>, log: Arc<dyn Log>, executor: Arc<dyn Executor>) -> Self {
        let home = std::env::var("HOME").unwrap_or_default();
        Self {
            config,
            log,
            executor,
            home,
        }
    }

    /// Replace the `{{HOME}}` value.
    #[must_use]
    pub fn with_home(mut self, home: impl Into<String>) -> Self {
        self.home = home.into();
        self
    }

    /// Create a copy of this context with a different logger.
    ///
    /// Used to give each app pipeline its own buffered logger while sharing
    /// everything else.
    #[must_use]
    pub fn with_log(&self, log: Arc<dyn Log>) -> Self {
        Self {
            config: Arc::clone(&self.config),
            log,
            executor: Arc::clone(&self.executor),
            home: self.home.clone(),
        }
    }

    /// Whether commands are only logged.
    #[must_use]
    pub fn dry_run(&self) -> bool {
        self.config.dry_run
    }
}
