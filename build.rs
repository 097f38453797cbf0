//! Embeds the build version (`UPDATER_VERSION` or `git describe`) into the binary.

use std::process::Command;

fn main() {
    // An explicit UPDATER_VERSION (set by release builds) wins over git describe.
    if let Ok(version) = std::env::var("UPDATER_VERSION") {
        println!("cargo:rustc-env=UPDATER_VERSION={version}");
    } else if let Ok(output) = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        && output.status.success()
    {
        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !version.is_empty() {
            println!("cargo:rustc-env=UPDATER_VERSION={version}");
        }
    }

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");
    println!("cargo:rerun-if-env-changed=UPDATER_VERSION");
}
