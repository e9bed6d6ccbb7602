//! Build script for the unit converter
//!
//! Embeds the build timestamp and, when built from a git checkout, the short
//! commit hash. Nothing is written into the source tree.

use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-env-changed=SOURCE_DATE_EPOCH");

    // Reproducible builds pin the clock through SOURCE_DATE_EPOCH
    let timestamp = std::env::var("SOURCE_DATE_EPOCH")
        .ok()
        .and_then(|s| s.trim().parse::<i64>().ok())
        .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
        .unwrap_or_else(chrono::Utc::now)
        .format("%Y-%m-%dT%H:%M:%SZ")
        .to_string();
    println!("cargo:rustc-env=UNITCONV_BUILD_TIMESTAMP={}", timestamp);

    let revision = Command::new("git")
        .args(["rev-parse", "--short=10", "HEAD"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    if let Some(revision) = revision {
        println!("cargo:rustc-env=UNITCONV_GIT_REVISION={}", revision);
    }
}
