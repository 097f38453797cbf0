//! Domain-specific error types for the updater.
//!
//! Internal modules return typed errors built with [`thiserror`]; the
//! command handlers at the CLI boundary convert them to [`anyhow::Error`]
//! through the standard `?` operator.
//!
//! # Error types
//!
//! ```text
//! UpdaterError
//! └── Pool(String)  # the worker pool could not be created
//! ConfigError       # reading or parsing the JSON config file
//! CommandError      # a single external command failed
//! ```
//!
//! Config and command errors never abort a run: the loader falls back to
//! defaults and command failures are carried in the update report.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the updater.
#[derive(Error, Debug)]
pub enum UpdaterError {
    /// The bounded worker pool could not be built.
    #[error("Worker pool error: {0}")]
    Pool(String),
}

/// Errors raised while loading a configuration file.
///
/// None of these abort a run: the loader logs them and falls back to the
/// built-in defaults.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file is not valid JSON or does not match the config schema.
    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        /// Path of the file that failed to parse.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// The candidate path names a directory.
    #[error("config file path {} is a directory", .path.display())]
    IsDirectory {
        /// The offending path.
        path: PathBuf,
    },
}

/// A single external command that could not be launched or exited non-zero.
///
/// The raw captured output is kept in [`CommandError::output`]; the
/// [`Display`](std::fmt::Display) form escapes newlines and tabs so the whole
/// error fits on one log line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("failed to run {program} {args}: {reason} - {}", escape_output(.output))]
pub struct CommandError {
    /// Program after placeholder substitution.
    pub program: String,
    /// Space-joined arguments after placeholder substitution.
    pub args: String,
    /// Exit status or launch error description.
    pub reason: String,
    /// Combined stdout and stderr captured before the failure.
    pub output: String,
}

/// Escape newlines and tabs to literal `\n` / `\t` sequences.
#[must_use]
pub fn escape_output(output: &str) -> String {
    output.replace('\n', "\\n").replace('\t', "\\t")
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn escape_output_replaces_newlines_and_tabs() {
        assert_eq!(escape_output("a\nb\tc\n"), "a\\nb\\tc\\n");
        assert_eq!(escape_output("plain"), "plain");
    }

    #[test]
    fn command_error_display_is_single_line() {
        let e = CommandError {
            program: "docker".to_string(),
            args: "compose pull".to_string(),
            reason: "exit status 1".to_string(),
            output: "pulling web\n\terror: denied\n".to_string(),
        };
        let text = e.to_string();
        assert_eq!(
            text,
            "failed to run docker compose pull: exit status 1 - pulling web\\n\\terror: denied\\n"
        );
        assert!(!text.contains('\n'));
    }

    #[test]
    fn command_error_keeps_raw_output() {
        let e = CommandError {
            program: "false".to_string(),
            args: String::new(),
            reason: "exit status 1".to_string(),
            output: "line one\nline two".to_string(),
        };
        assert_eq!(e.output, "line one\nline two");
    }

    #[test]
    fn config_error_io_display() {
        let e = ConfigError::Io {
            path: PathBuf::from("/etc/docker-app-updater/config.json"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        };
        let text = e.to_string();
        assert!(text.contains("/etc/docker-app-updater/config.json"));
        assert!(text.contains("failed to read config file"));
    }

    #[test]
    fn config_error_parse_has_source() {
        use std::error::Error as StdError;
        let source = serde_json::from_str::<serde_json::Value>("{").expect_err("invalid json");
        let e = ConfigError::Parse {
            path: PathBuf::from("config.json"),
            source,
        };
        assert!(e.source().is_some());
    }

    #[test]
    fn config_error_is_directory_display() {
        let e = ConfigError::IsDirectory {
            path: PathBuf::from("/tmp/config"),
        };
        assert_eq!(e.to_string(), "config file path /tmp/config is a directory");
    }

    #[test]
    fn updater_error_pool_display() {
        let e = UpdaterError::Pool("thread spawn failed".to_string());
        assert_eq!(e.to_string(), "Worker pool error: thread spawn failed");
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn all_error_types_are_send_sync() {
        assert_send_sync::<UpdaterError>();
        assert_send_sync::<ConfigError>();
        assert_send_sync::<CommandError>();
    }

    #[test]
    fn errors_convert_to_anyhow() {
        let e = ConfigError::IsDirectory {
            path: PathBuf::from("/x"),
        };
        let _anyhow_err: anyhow::Error = e.into();
    }
}
