//! Configuration warnings: normalization notes and environment checks.
//!
//! Warnings never change what runs. They point the operator at entries
//! that are likely to fail (missing app directories, programs that are not
//! on `PATH`) before the pool starts.
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use super::{App, Command, Config};

/// A validation warning detected while loading or checking configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The config field the warning is about (e.g. `apps`, `max_threads`).
    pub source: String,
    /// The specific item that triggered the warning.
    pub item: String,
    /// Human-readable warning message.
    pub message: String,
}

impl ValidationWarning {
    /// Create a warning.
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        item: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            item: item.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.source, self.item, self.message)
    }
}

/// Trait for configuration validators.
pub trait ConfigValidator {
    /// Validate and return any warnings found.
    fn validate(&self) -> Vec<ValidationWarning>;
}

/// Checks app names and directories.
#[derive(Debug)]
pub struct AppValidator<'a> {
    apps: &'a [App],
}

impl<'a> AppValidator<'a> {
    /// Validate `apps`.
    #[must_use]
    pub const fn new(apps: &'a [App]) -> Self {
        Self { apps }
    }
}

impl ConfigValidator for AppValidator<'_> {
    fn validate(&self) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();
        let mut seen = HashSet::new();

        for (index, app) in self.apps.iter().enumerate() {
            let item = if app.name.is_empty() {
                format!("#{}", index + 1)
            } else {
                app.name.clone()
            };

            if app.name.is_empty() {
                warnings.push(ValidationWarning::new("apps", &item, "app has no name"));
            } else if !seen.insert(app.name.as_str()) {
                warnings.push(ValidationWarning::new(
                    "apps",
                    &item,
                    "duplicate app name, log lines will be ambiguous",
                ));
            }

            if app.path.is_empty() {
                warnings.push(ValidationWarning::new(
                    "apps",
                    &item,
                    "no path set, commands run in the current directory",
                ));
            } else if !Path::new(&app.path).is_dir() {
                warnings.push(ValidationWarning::new(
                    "apps",
                    &item,
                    format!("path is not a directory: {}", app.path),
                ));
            }
        }

        warnings
    }
}

/// Checks that each command's program can be found.
///
/// Programs containing a placeholder are skipped since they only resolve
/// at execution time.
#[derive(Debug)]
pub struct ProgramValidator<'a> {
    source: &'static str,
    commands: Vec<&'a Command>,
}

impl<'a> ProgramValidator<'a> {
    /// Validate the programs of `commands`, reporting them under `source`.
    #[must_use]
    pub fn new(source: &'static str, commands: impl IntoIterator<Item = &'a Command>) -> Self {
        Self {
            source,
            commands: commands.into_iter().collect(),
        }
    }
}

impl ConfigValidator for ProgramValidator<'_> {
    fn validate(&self) -> Vec<ValidationWarning> {
        let mut checked = HashSet::new();
        let mut warnings = Vec::new();

        for program in self.commands.iter().filter_map(|c| c.first()) {
            if program.contains("{{") || !checked.insert(program.as_str()) {
                continue;
            }
            if which::which(program).is_err() {
                warnings.push(ValidationWarning::new(
                    self.source,
                    program,
                    "program not found on PATH",
                ));
            }
        }

        warnings
    }
}

impl Config {
    /// Check the configuration against the current environment.
    #[must_use]
    pub fn validate(&self) -> Vec<ValidationWarning> {
        let validators: Vec<Box<dyn ConfigValidator + '_>> = vec![
            Box::new(AppValidator::new(&self.apps)),
            Box::new(ProgramValidator::new(
                "refresh_commands",
                &self.refresh_commands,
            )),
            Box::new(ProgramValidator::new(
                "apps",
                self.apps.iter().flat_map(|a| &a.after_commands),
            )),
            Box::new(ProgramValidator::new("after_commands", &self.after_commands)),
        ];
        validators.iter().flat_map(|v| v.validate()).collect()
    }
}
