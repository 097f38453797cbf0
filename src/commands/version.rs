//! Command: print version information.

/// Version string: `git describe` at build time, else the crate version.
#[must_use]
pub fn version() -> &'static str {
    option_env!("UPDATER_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Print the updater version to stdout.
pub fn run() {
    println!("{} {}", crate::APP_NAME, version());
}
