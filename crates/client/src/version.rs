use std::fmt;

/// Compile-time build metadata recorded by `build.rs`
#[derive(Debug, Clone, Copy)]
pub struct BuildInfo {
    pub package: &'static str,
    pub version: &'static str,
    pub repo_version: &'static str,
    pub profile: &'static str,
    pub target: &'static str,
    pub timestamp: &'static str,
}

pub const BUILD_INFO: BuildInfo = BuildInfo {
    package: env!("CARGO_PKG_NAME"),
    version: env!("CARGO_PKG_VERSION"),
    repo_version: env!("REPO_VERSION"),
    profile: env!("BUILD_PROFILE"),
    target: env!("BUILD_TARGET"),
    timestamp: env!("BUILD_TIMESTAMP"),
};

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({}, {} build for {}, built {})",
            self.package, self.version, self.repo_version, self.profile, self.target, self.timestamp
        )
    }
}
