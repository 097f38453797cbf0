//! Subcommand handlers and their shared setup.

pub mod config;
pub mod update;
pub mod version;

use crate::cli::GlobalOpts;
use crate::config::{Config, SearchPaths};
use crate::logging::{LevelHandle, Log, parse_level};

/// Shared state produced by the common command setup sequence.
///
/// Encapsulates configuration discovery, loading, CLI overrides and log
/// level selection so that each command does not have to repeat them.
#[derive(Debug)]
pub struct CommandSetup {
    /// Effective configuration with CLI overrides applied.
    pub config: Config,
}

impl CommandSetup {
    /// Discover and load the configuration, then apply `--dry-run` and the
    /// configured log level.
    ///
    /// Never fails: a missing or malformed config file falls back to the
    /// defaults with a warning.
    pub fn init(global: &GlobalOpts, log: &dyn Log, level: &LevelHandle) -> Self {
        log.stage("Loading configuration");
        let paths = SearchPaths::from_env(global.config.as_deref(), log);
        let mut config = Config::load(&paths, log);

        if global.dry_run {
            config.dry_run = true;
        }
        apply_log_level(&config.log_level, level, log);

        log.debug(&format!("{} app(s)", config.apps.len()));
        log.debug(&format!("{} refresh command(s)", config.refresh_commands.len()));
        log.debug(&format!("{} post-update command(s)", config.after_commands.len()));
        log.debug(&format!("max threads: {}", config.max_threads));
        if config.dry_run {
            log.info("dry run: commands will be logged, not run");
        }

        let warnings = config.validate();
        if !warnings.is_empty() {
            log.warn(&format!(
                "found {} configuration warning(s):",
                warnings.len()
            ));
            for warning in &warnings {
                log.warn(&format!("  {warning}"));
            }
        }

        Self { config }
    }
}

/// Apply the configured `log_level`, falling back to `info`.
fn apply_log_level(value: &str, level: &LevelHandle, log: &dyn Log) {
    if level.is_verbose() {
        return;
    }
    let filter = parse_level(value).unwrap_or_else(|| {
        log.warn(&format!("invalid log_level {value:?}, using info"));
        tracing_subscriber::filter::LevelFilter::INFO
    });
    level.set_level(filter);
}
