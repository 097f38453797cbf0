//! Docker app updater.
//!
//! Refreshes a set of independently configured applications by running a
//! command pipeline for each of them on a bounded worker pool, then runs a
//! global post-update pipeline once every app has finished.
//!
//! The public API is organised into these layers:
//!
//! - **[`config`]**: discover, parse, normalize and validate the JSON config
//! - **[`substitute`]**: `{{app.name}}`, `{{app.path}}` and `{{HOME}}` expansion
//! - **[`exec`]**: spawn one process and capture its combined output
//! - **[`update`]**: per-app pipelines, the worker pool and the post-update phase
//! - **[`commands`]**: top-level subcommand orchestration (`update`, `config`, `version`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod substitute;
pub mod update;

/// Program name used in version output and the log directory.
pub const APP_NAME: &str = "docker-app-updater";
