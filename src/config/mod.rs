//! JSON configuration: types, defaults, normalization and loading.
//!
//! The configuration is read once by the entry point and passed down as an
//! immutable value. A missing, unreadable or malformed file never aborts a
//! run; the loader logs a warning and falls back to [`Config::default`].
pub mod discovery;
pub mod validation;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::logging::Log;

pub use discovery::SearchPaths;
pub use validation::ValidationWarning;

/// One external command: `tokens[0]` is the program, the rest are arguments.
pub type Command = Vec<String>;

/// Default `log_level`.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default `max_threads`.
pub const DEFAULT_MAX_THREADS: usize = 3;

/// Upper bound for `max_threads`.
pub const MAX_THREADS_CEILING: usize = 100;

/// Refresh commands used when the config file does not set any.
#[must_use]
pub fn default_refresh_commands() -> Vec<Command> {
    vec![
        vec!["docker".into(), "compose".into(), "pull".into()],
        vec![
            "docker".into(),
            "compose".into(),
            "up".into(),
            "-d".into(),
            "--remove-orphans".into(),
        ],
    ]
}

/// A configured application: a directory holding a deployment descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct App {
    /// Identifier used in logs and as `{{app.name}}`.
    pub name: String,
    /// Working directory for the app's commands, also `{{app.path}}`.
    pub path: String,
    /// Commands run after the refresh commands, for this app only.
    pub after_commands: Vec<Command>,
}

/// Effective, normalized configuration.
///
/// Invariants after loading: `max_threads` is in `1..=100`, `log_level` is
/// non-empty, and no command in any list is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    /// Log commands instead of running them.
    pub dry_run: bool,
    /// Log level name (`debug`, `info`, `warn`, `error`, ...).
    pub log_level: String,
    /// Maximum number of apps updated at the same time.
    pub max_threads: usize,
    /// Commands run for every app, in order.
    pub refresh_commands: Vec<Command>,
    /// Apps to update.
    pub apps: Vec<App>,
    /// Commands run once, sequentially, after every app finished.
    pub after_commands: Vec<Command>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dry_run: false,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            max_threads: DEFAULT_MAX_THREADS,
            refresh_commands: default_refresh_commands(),
            apps: Vec::new(),
            after_commands: Vec::new(),
        }
    }
}

/// The config document as written on disk; every field may be absent or null.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    dry_run: Option<bool>,
    log_level: Option<String>,
    max_threads: Option<i64>,
    refresh_commands: Option<Vec<Option<Command>>>,
    apps: Option<Vec<Option<RawApp>>>,
    after_commands: Option<Vec<Option<Command>>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawApp {
    name: Option<String>,
    path: Option<String>,
    after_commands: Option<Vec<Option<Command>>>,
}

/// A normalized configuration plus the warnings raised while normalizing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedConfig {
    /// The effective configuration.
    pub config: Config,
    /// Defaults applied and entries dropped during normalization.
    pub warnings: Vec<ValidationWarning>,
}

impl Config {
    /// Load the configuration from the first usable candidate in `paths`.
    ///
    /// Falls back to [`Config::default`] wholesale when no candidate exists
    /// or the chosen file cannot be read or parsed. Normalization warnings
    /// are logged at warn level.
    pub fn load(paths: &SearchPaths, log: &dyn Log) -> Self {
        let Some(path) = paths.resolve(log) else {
            log.warn("no valid config file found, using default configuration");
            return Self::default();
        };

        match Self::from_file(&path) {
            Ok(loaded) => {
                log.debug(&format!("loaded config from {}", path.display()));
                for warning in &loaded.warnings {
                    log.warn(&warning.to_string());
                }
                loaded.config
            }
            Err(e) => {
                log.warn(&format!("{e}, using default configuration"));
                Self::default()
            }
        }
    }

    /// Read and normalize a config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::IsDirectory`] if `path` is a directory,
    /// [`ConfigError::Io`] if it cannot be read, and [`ConfigError::Parse`]
    /// if it is not a valid config document.
    pub fn from_file(path: &Path) -> Result<LoadedConfig, ConfigError> {
        if path.is_dir() {
            return Err(ConfigError::IsDirectory {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse and normalize a config document. Unknown fields are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not valid JSON or a field has the wrong type.
    pub fn from_json(json: &str) -> Result<LoadedConfig, serde_json::Error> {
        let raw: RawConfig = serde_json::from_str(json)?;
        Ok(normalize(raw))
    }

    /// Serialize the effective configuration as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn normalize(raw: RawConfig) -> LoadedConfig {
    let mut warnings = Vec::new();

    let log_level = raw
        .log_level
        .filter(|level| !level.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

    let max_threads = match raw.max_threads {
        None => {
            warnings.push(ValidationWarning::new(
                "max_threads",
                "unset",
                format!("max_threads not set, using default ({DEFAULT_MAX_THREADS})"),
            ));
            DEFAULT_MAX_THREADS
        }
        Some(n) if n <= 0 => {
            warnings.push(ValidationWarning::new(
                "max_threads",
                n.to_string(),
                format!("invalid max_threads {n}, using default ({DEFAULT_MAX_THREADS})"),
            ));
            DEFAULT_MAX_THREADS
        }
        Some(n) => match usize::try_from(n) {
            Ok(n) if n <= MAX_THREADS_CEILING => n,
            _ => {
                warnings.push(ValidationWarning::new(
                    "max_threads",
                    n.to_string(),
                    format!("max_threads too high ({n}), capping at {MAX_THREADS_CEILING}"),
                ));
                MAX_THREADS_CEILING
            }
        },
    };

    let refresh_commands = raw.refresh_commands.map_or_else(default_refresh_commands, |cmds| {
        drop_empty_commands(cmds, "refresh_commands", "refresh_commands", &mut warnings)
    });

    let mut apps = Vec::new();
    for (index, app) in raw.apps.unwrap_or_default().into_iter().enumerate() {
        let Some(app) = app else {
            warnings.push(ValidationWarning::new(
                "apps",
                format!("#{}", index + 1),
                "app entry is null, ignoring it",
            ));
            continue;
        };
        let name = app.name.unwrap_or_default();
        let after_commands = drop_empty_commands(
            app.after_commands.unwrap_or_default(),
            "apps",
            &name,
            &mut warnings,
        );
        apps.push(App {
            path: app.path.unwrap_or_default(),
            name,
            after_commands,
        });
    }

    let after_commands = drop_empty_commands(
        raw.after_commands.unwrap_or_default(),
        "after_commands",
        "after_commands",
        &mut warnings,
    );

    LoadedConfig {
        config: Config {
            dry_run: raw.dry_run.unwrap_or_default(),
            log_level,
            max_threads,
            refresh_commands,
            apps,
            after_commands,
        },
        warnings,
    }
}

/// Remove null commands and commands with no tokens, recording a warning
/// for each.
fn drop_empty_commands(
    commands: Vec<Option<Command>>,
    source: &str,
    item: &str,
    warnings: &mut Vec<ValidationWarning>,
) -> Vec<Command> {
    let mut kept = Vec::with_capacity(commands.len());
    for (index, command) in commands.into_iter().enumerate() {
        match command {
            Some(command) if !command.is_empty() => kept.push(command),
            _ => warnings.push(ValidationWarning::new(
                source,
                item,
                format!("command #{} is empty, ignoring it", index + 1),
            )),
        }
    }
    kept
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn load(json: &str) -> LoadedConfig {
        Config::from_json(json).expect("valid config json")
    }

    #[test]
    fn default_config_values() {
        let config = Config::default();
        assert!(!config.dry_run);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.max_threads, 3);
        assert_eq!(config.refresh_commands, default_refresh_commands());
        assert!(config.apps.is_empty());
        assert!(config.after_commands.is_empty());
    }

    #[test]
    fn non_positive_max_threads_falls_back_to_default() {
        for n in [0, -1, -100] {
            let loaded = load(&format!(r#"{{"max_threads": {n}}}"#));
            assert_eq!(loaded.config.max_threads, DEFAULT_MAX_THREADS, "max_threads {n}");
            assert!(
                loaded.warnings.iter().any(|w| w.source == "max_threads"),
                "expected a max_threads warning for {n}"
            );
        }
    }

    #[test]
    fn missing_max_threads_falls_back_with_warning() {
        let loaded = load("{}");
        assert_eq!(loaded.config.max_threads, DEFAULT_MAX_THREADS);
        assert_eq!(loaded.warnings.len(), 1);
        assert_eq!(loaded.warnings[0].source, "max_threads");
    }

    #[test]
    fn large_max_threads_is_clamped() {
        for n in [101, 5000, i64::MAX] {
            let loaded = load(&format!(r#"{{"max_threads": {n}}}"#));
            assert_eq!(loaded.config.max_threads, MAX_THREADS_CEILING, "max_threads {n}");
            assert!(loaded.warnings[0].message.contains("capping at 100"));
        }
    }

    #[test]
    fn in_range_max_threads_is_kept_without_warning() {
        for n in [1, 7, 100] {
            let loaded = load(&format!(r#"{{"max_threads": {n}}}"#));
            assert_eq!(loaded.config.max_threads, usize::try_from(n).unwrap());
            assert!(loaded.warnings.is_empty());
        }
    }

    #[test]
    fn missing_or_null_apps_become_empty() {
        assert!(load(r#"{"max_threads": 2}"#).config.apps.is_empty());
        assert!(load(r#"{"max_threads": 2, "apps": null}"#).config.apps.is_empty());
    }

    #[test]
    fn null_refresh_commands_use_defaults_but_empty_list_is_kept() {
        let defaulted = load(r#"{"max_threads": 2, "refresh_commands": null}"#);
        assert_eq!(defaulted.config.refresh_commands, default_refresh_commands());
        let explicit = load(r#"{"max_threads": 2, "refresh_commands": []}"#);
        assert!(explicit.config.refresh_commands.is_empty());
    }

    #[test]
    fn empty_log_level_uses_default() {
        assert_eq!(load(r#"{"log_level": ""}"#).config.log_level, "info");
        assert_eq!(load(r#"{"log_level": "debug"}"#).config.log_level, "debug");
    }

    #[test]
    fn apps_are_parsed_in_order() {
        let loaded = load(
            r#"{
                "max_threads": 4,
                "apps": [
                    {"name": "web", "path": "/srv/web", "after_commands": [["docker", "image", "prune", "-f"]]},
                    {"name": "db", "path": "/srv/db"}
                ]
            }"#,
        );
        let apps = &loaded.config.apps;
        assert_eq!(apps.len(), 2);
        assert_eq!(apps[0].name, "web");
        assert_eq!(apps[0].path, "/srv/web");
        assert_eq!(apps[0].after_commands, vec![vec!["docker", "image", "prune", "-f"]]);
        assert_eq!(apps[1].name, "db");
        assert!(apps[1].after_commands.is_empty());
    }

    #[test]
    fn empty_commands_are_dropped_with_warnings() {
        let loaded = load(
            r#"{
                "max_threads": 2,
                "refresh_commands": [[], ["docker", "compose", "pull"]],
                "apps": [{"name": "web", "path": "/srv/web", "after_commands": [[]]}],
                "after_commands": [["echo", "done"], []]
            }"#,
        );
        let config = &loaded.config;
        assert_eq!(config.refresh_commands, vec![vec!["docker", "compose", "pull"]]);
        assert!(config.apps[0].after_commands.is_empty());
        assert_eq!(config.after_commands, vec![vec!["echo", "done"]]);
        assert_eq!(loaded.warnings.len(), 3);
        assert!(loaded.warnings.iter().any(|w| w.item == "web"));
    }

    #[test]
    fn null_app_entries_are_skipped_with_warning() {
        let loaded = load(r#"{"max_threads": 2, "apps": [null, {"name": "web"}, null]}"#);
        let names: Vec<_> = loaded.config.apps.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["web"]);
        let items: Vec<_> = loaded.warnings.iter().map(|w| w.item.as_str()).collect();
        assert_eq!(items, ["#1", "#3"]);
        assert!(loaded.warnings[0].message.contains("null"));
    }

    #[test]
    fn null_commands_are_dropped_like_empty_ones() {
        let loaded = load(
            r#"{
                "max_threads": 2,
                "refresh_commands": [null, ["docker", "compose", "pull"]],
                "apps": [{"name": "web", "after_commands": [null]}],
                "after_commands": [null]
            }"#,
        );
        let config = &loaded.config;
        assert_eq!(config.refresh_commands, vec![vec!["docker", "compose", "pull"]]);
        assert!(config.apps[0].after_commands.is_empty());
        assert!(config.after_commands.is_empty());
        assert_eq!(loaded.warnings.len(), 3);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let loaded = load(r#"{"max_threads": 2, "color": "blue", "apps": [{"name": "a", "extra": 1}]}"#);
        assert_eq!(loaded.config.apps[0].name, "a");
        assert_eq!(loaded.config.apps[0].path, "");
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(Config::from_json("{not json").is_err());
        assert!(Config::from_json(r#"{"max_threads": "three"}"#).is_err());
    }

    #[test]
    fn normalization_is_idempotent() {
        let first = load(
            r#"{
                "dry_run": true,
                "log_level": "",
                "max_threads": 500,
                "apps": [{"name": "web", "path": "/srv/web"}],
                "after_commands": [["echo", "{{HOME}}"]]
            }"#,
        )
        .config;
        let json = first.to_json_pretty().unwrap();
        let second = load(&json);
        assert_eq!(first, second.config);
        assert!(second.warnings.is_empty(), "normalized config should not warn again");
    }

    #[test]
    fn from_file_rejects_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::from_file(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::IsDirectory { .. }));
    }

    #[test]
    fn from_file_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "[1, 2").unwrap();
        let err = Config::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn from_file_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::from_file(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
