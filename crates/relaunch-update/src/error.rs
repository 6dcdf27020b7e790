//! Error types for relaunch-update

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias using relaunch-update's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Update protocol error types
#[derive(Error, Debug)]
pub enum Error {
    /// Version string is not exactly `X.Y.Z`
    #[error("Invalid version format: '{input}' (expected MAJOR.MINOR.PATCH)")]
    VersionFormat { input: String },

    /// Transport failure or non-success status
    #[error("Network error fetching {url}: {message}")]
    Network { url: String, message: String },

    /// No platform tag for this host
    #[error("Unsupported platform {os}/{arch}. Automatic updating isn't permitted")]
    UnsupportedPlatform { os: String, arch: String },

    /// Write, rename or delete failure
    #[error("Filesystem error on {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Relaunch of the new binary failed
    #[error("Failed to start {}: {source}. Run the updated app manually", program.display())]
    ProcessSpawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Git operation failed
    #[error("Git operation failed: {message}")]
    GitOperation { message: String },

    /// Git command not found
    #[error("Git command not found. Please ensure git is installed and in PATH")]
    GitNotFound,

    /// Configuration error
    #[error(transparent)]
    Config(#[from] relaunch_core::Error),
}

impl Error {
    /// Create a version format error
    pub fn version_format(input: impl Into<String>) -> Self {
        Self::VersionFormat {
            input: input.into(),
        }
    }

    /// Create a network error
    pub fn network(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Network {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create an unsupported platform error
    pub fn unsupported_platform(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self::UnsupportedPlatform {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// Create a filesystem error for `path`
    pub fn filesystem(path: &Path, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Create a process spawn error for `program`
    pub fn process_spawn(program: &Path, source: std::io::Error) -> Self {
        Self::ProcessSpawn {
            program: program.to_path_buf(),
            source,
        }
    }

    /// Create a git operation error
    pub fn git_operation(message: impl Into<String>) -> Self {
        Self::GitOperation {
            message: message.into(),
        }
    }
}
