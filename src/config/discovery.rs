//! Config file discovery across the prioritized candidate paths.
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::logging::Log;

/// Environment variable naming an explicit config file.
pub const CONFIG_FILE_ENV: &str = "CONFIG_FILE";

/// Ordered list of config file candidates; the first usable one wins.
///
/// Order: explicit `--config` path, `$CONFIG_FILE`,
/// `<cwd>/config/config.json`, `<home>/.config/docker-app-updater/config.json`,
/// `/etc/docker-app-updater/config.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPaths {
    candidates: Vec<PathBuf>,
}

impl SearchPaths {
    /// Build the candidate list from explicit inputs.
    ///
    /// Blank explicit and environment values are ignored; surrounding
    /// whitespace is trimmed.
    #[must_use]
    pub fn new(
        explicit: Option<&Path>,
        env_file: Option<&OsStr>,
        cwd: Option<PathBuf>,
        home: Option<PathBuf>,
    ) -> Self {
        let mut candidates = Vec::new();

        if let Some(path) = explicit.and_then(|p| non_blank(p.as_os_str())) {
            candidates.push(path);
        }
        if let Some(path) = env_file.and_then(non_blank) {
            candidates.push(path);
        }
        if let Some(cwd) = cwd {
            candidates.push(cwd.join("config").join("config.json"));
        }
        if let Some(home) = home {
            candidates.push(
                home.join(".config")
                    .join(crate::APP_NAME)
                    .join("config.json"),
            );
        }
        candidates.push(
            Path::new("/etc")
                .join(crate::APP_NAME)
                .join("config.json"),
        );

        Self { candidates }
    }

    /// Build the candidate list from the process environment.
    ///
    /// A working or home directory that cannot be determined is logged at
    /// debug level and left out.
    pub fn from_env(explicit: Option<&Path>, log: &dyn Log) -> Self {
        let cwd = match std::env::current_dir() {
            Ok(cwd) => Some(cwd),
            Err(e) => {
                log.debug(&format!("cannot determine working directory: {e}"));
                None
            }
        };
        let home = std::env::var_os("HOME")
            .filter(|h| !h.is_empty())
            .map(PathBuf::from);
        if home.is_none() {
            log.debug("cannot determine home directory: HOME is not set");
        }
        let env_file = std::env::var_os(CONFIG_FILE_ENV);
        Self::new(explicit, env_file.as_deref(), cwd, home)
    }

    /// All candidates, highest priority first.
    #[must_use]
    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// Return the first candidate that exists and is a regular file.
    ///
    /// Missing paths are skipped silently; directories and paths that
    /// cannot be inspected are skipped with a warning.
    pub fn resolve(&self, log: &dyn Log) -> Option<PathBuf> {
        for candidate in &self.candidates {
            log.debug(&format!("checking config path: {}", candidate.display()));
            match std::fs::metadata(candidate) {
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    log.warn(&format!(
                        "failed to access config file {}: {e}",
                        candidate.display()
                    ));
                }
                Ok(meta) if meta.is_dir() => {
                    log.warn(&format!(
                        "config file path {} is a directory, skipping",
                        candidate.display()
                    ));
                }
                Ok(_) => return Some(candidate.clone()),
            }
        }
        None
    }
}

fn non_blank(value: &OsStr) -> Option<PathBuf> {
    let text = value.to_string_lossy();
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
}
