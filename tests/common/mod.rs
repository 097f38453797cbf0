// Shared helpers for integration tests.
//
// Provides a temporary directory holding app directories and config files,
// plus shortcuts for building an update context around a chosen executor.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use docker_app_updater::config::{App, Command, Config};
use docker_app_updater::exec::Executor;
use docker_app_updater::logging::{Log, Logger};
use docker_app_updater::update::Context;

/// Build a command from string tokens.
pub fn cmd(tokens: &[&str]) -> Command {
    tokens.iter().map(ToString::to_string).collect()
}

/// An isolated test environment backed by a [`tempfile::TempDir`].
pub struct TestEnv {
    /// Temporary directory holding app directories and config files.
    pub root: tempfile::TempDir,
}

impl TestEnv {
    /// Create an empty environment.
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().expect("create temp dir"),
        }
    }

    /// Path to the environment root.
    pub fn root_path(&self) -> &Path {
        self.root.path()
    }

    /// Create `apps/<name>` and return an [`App`] pointing at it.
    pub fn app(&self, name: &str, after_commands: Vec<Command>) -> App {
        let dir = self.root.path().join("apps").join(name);
        std::fs::create_dir_all(&dir).expect("create app dir");
        App {
            name: name.to_string(),
            path: dir.to_str().expect("utf-8 temp path").to_string(),
            after_commands,
        }
    }

    /// Write `content` to `<root>/<filename>` and return its path.
    pub fn write_file(&self, filename: &str, content: &str) -> PathBuf {
        let path = self.root.path().join(filename);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dir");
        }
        std::fs::write(&path, content).expect("write file");
        path
    }
}

/// Build an update context for `config` around `executor`.
///
/// Returns the concrete logger too, since the orchestrator needs it for
/// per-app buffering.
pub fn context(config: Config, executor: Arc<dyn Executor>, home: &str) -> (Context, Arc<Logger>) {
    let logger = Arc::new(Logger::with_log_file(None));
    let ctx = Context::new(
        Arc::new(config),
        Arc::clone(&logger) as Arc<dyn Log>,
        executor,
    )
    .with_home(home);
    (ctx, logger)
}
