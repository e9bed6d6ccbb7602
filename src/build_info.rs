//! Build metadata
//!
//! Package identity comes from Cargo; the timestamp and git revision are
//! embedded by `build.rs`.

use serde::Serialize;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// UTC build time, or `"unknown"` when built without the build script
pub const BUILD_TIMESTAMP: &str = match option_env!("UNITCONV_BUILD_TIMESTAMP") {
    Some(s) => s,
    None => "unknown",
};

/// Short commit hash when built from a git checkout
pub const GIT_REVISION: Option<&str> = option_env!("UNITCONV_GIT_REVISION");

/// `1.0.0` or `1.0.0+<revision>`
fn version_label(version: &str, revision: Option<&str>) -> String {
    match revision {
        Some(rev) => format!("{}+{}", version, rev),
        None => version.to_string(),
    }
}

/// Identity of the running binary, as reported by `/api/status`
#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub git_revision: Option<&'static str>,
    pub build_timestamp: &'static str,
    pub description: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            name: NAME,
            version: VERSION,
            git_revision: GIT_REVISION,
            build_timestamp: BUILD_TIMESTAMP,
            description: DESCRIPTION,
        }
    }

    pub fn version_label(&self) -> String {
        version_label(self.version, self.git_revision)
    }
}

/// Log the startup banner
pub fn log_startup_banner() {
    let info = BuildInfo::current();
    tracing::info!(
        "{} {} (built {}): {}",
        info.name,
        info.version_label(),
        info.build_timestamp,
        info.description
    );
}
