//! External process execution.
//!
//! Commands are spawned directly, never through a shell. Standard output
//! and standard error share one OS pipe, so the captured text interleaves
//! exactly as the process wrote it.
use std::io::Read as _;
use std::path::Path;
use std::process::{Command, Stdio};

/// Result of a finished process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecResult {
    /// Combined stdout and stderr, lossily decoded as UTF-8.
    pub output: String,
    /// Whether the process exited with status zero.
    pub success: bool,
    /// Exit code, `None` when the process was killed by a signal.
    pub code: Option<i32>,
}

impl ExecResult {
    /// Describe how the process ended, for error messages.
    #[must_use]
    pub fn status_description(&self) -> String {
        self.code.map_or_else(
            || "terminated by signal".to_string(),
            |code| format!("exit status {code}"),
        )
    }
}

/// Runs one external process to completion.
///
/// Production code uses [`SystemExecutor`]; tests substitute a mock.
#[cfg_attr(test, mockall::automock)]
pub trait Executor: Send + Sync {
    /// Run `program` with `args` in `dir` and capture its combined output.
    ///
    /// An empty `dir` inherits the caller's working directory. A non-zero
    /// exit is reported through [`ExecResult::success`], not as an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or its output
    /// cannot be read.
    fn run(&self, program: &str, args: &[String], dir: &Path) -> std::io::Result<ExecResult>;
}

/// [`Executor`] that spawns real processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn run(&self, program: &str, args: &[String], dir: &Path) -> std::io::Result<ExecResult> {
        let (mut reader, writer) = std::io::pipe()?;

        // The command owns the write ends; dropping it right after spawn
        // leaves the child as the only writer, so the read below ends at exit.
        let mut child = {
            let mut cmd = Command::new(program);
            cmd.args(args)
                .stdin(Stdio::null())
                .stdout(writer.try_clone()?)
                .stderr(writer);
            if !dir.as_os_str().is_empty() {
                cmd.current_dir(dir);
            }
            cmd.spawn()?
        };

        let mut raw = Vec::new();
        let read = reader.read_to_end(&mut raw);
        let status = child.wait()?;
        read?;

        Ok(ExecResult {
            output: String::from_utf8_lossy(&raw).into_owned(),
            success: status.success(),
            code: status.code(),
        })
    }
}
