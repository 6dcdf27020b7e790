//! Build information for the relaunch binary

use serde::Serialize;
use std::fmt;

/// Version, commit and target baked in at build time
#[derive(Debug, Clone, Copy, Serialize)]
pub struct VersionInfo {
    pub version: &'static str,
    pub commit: Option<&'static str>,
    pub target: Option<&'static str>,
}

impl VersionInfo {
    pub const fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            commit: option_env!("GIT_SHA"),
            target: option_env!("TARGET"),
        }
    }
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "relaunch {}", self.version)?;
        if let Some(commit) = self.commit {
            write!(f, " ({})", commit)?;
        }
        if let Some(target) = self.target {
            write!(f, " {}", target)?;
        }
        Ok(())
    }
}
