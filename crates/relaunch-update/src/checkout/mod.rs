//! Working-copy update mode
//!
//! For deployments that are a git checkout rather than a standalone binary.
//! When online and the remote publishes a newer version than the working
//! copy's own `version.txt`, the checkout is synced to its remote branch:
//!
//! 1. `git fetch --all`
//! 2. `git branch --show-current`
//! 3. `git reset --hard {remote}/{branch}`
//! 4. `git clean -fd`
//!
//! Every command runs with the working copy as its own working directory;
//! the process working directory is never changed.

pub mod git;

use camino::{Utf8Path, Utf8PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use relaunch_core::RuntimeConfig;

use crate::error::{Error, Result};
use crate::probe::ConnectivityProbe;
use crate::releases::RemoteVersionSource;
use crate::version::{is_newer, SemVer};

/// Result of a checkout sync
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Probe failed; nothing was attempted
    Offline,

    /// Working copy already at or above the published version
    UpToDate { current: SemVer, latest: SemVer },

    /// Working copy reset to its remote branch
    Synced {
        branch: String,
        previous: SemVer,
        latest: SemVer,
    },
}

/// Syncs a git working copy to its remote when a newer version is published
pub struct CheckoutUpdater {
    work_tree: Utf8PathBuf,
    remote: String,
    version_file: String,
    source: RemoteVersionSource,
    probe: Arc<dyn ConnectivityProbe>,
}

impl CheckoutUpdater {
    pub fn new(
        work_tree: impl Into<Utf8PathBuf>,
        source: RemoteVersionSource,
        probe: Arc<dyn ConnectivityProbe>,
    ) -> Self {
        Self {
            work_tree: work_tree.into(),
            remote: "origin".to_string(),
            version_file: "version.txt".to_string(),
            source,
            probe,
        }
    }

    /// Create an updater using the `checkout` section of `config`
    pub fn from_config(
        config: &RuntimeConfig,
        work_tree: impl Into<Utf8PathBuf>,
        source: RemoteVersionSource,
        probe: Arc<dyn ConnectivityProbe>,
    ) -> Self {
        Self::new(work_tree, source, probe)
            .with_remote(&config.checkout.remote)
            .with_version_file(&config.checkout.version_file)
    }

    /// Remote whose branch the checkout is reset to
    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = remote.into();
        self
    }

    /// Version file, relative to the working copy
    pub fn with_version_file(mut self, file: impl Into<String>) -> Self {
        self.version_file = file.into();
        self
    }

    pub fn work_tree(&self) -> &Utf8Path {
        &self.work_tree
    }

    /// Version recorded in the working copy, sentinel when missing or malformed
    pub async fn local_version(&self) -> SemVer {
        let path = self.work_tree.join(&self.version_file);
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => SemVer::parse_or_sentinel(&text),
            Err(e) => {
                debug!("No local version at {}: {}", path, e);
                SemVer::SENTINEL
            }
        }
    }

    /// Check for a newer version and sync the working copy to it.
    ///
    /// # Errors
    /// Returns error if git is missing, the directory is not a working copy,
    /// or any git step fails; later steps are not attempted after a failure.
    pub async fn sync(&self) -> Result<CheckoutOutcome> {
        git::ensure_git_available()?;

        if !git::is_work_tree(&self.work_tree).await {
            return Err(Error::git_operation(format!(
                "{} is not a git working copy",
                self.work_tree
            )));
        }

        if !self.probe.is_reachable().await {
            warn!("No internet connection, skipping update");
            return Ok(CheckoutOutcome::Offline);
        }

        let current = self.local_version().await;
        let latest = self.source.latest_version().await;

        if !is_newer(&latest, &current) {
            info!("Working copy is up to date ({})", current);
            return Ok(CheckoutOutcome::UpToDate { current, latest });
        }

        info!(
            "Updating working copy {} from {} to {}",
            self.work_tree, current, latest
        );

        git::fetch_all(&self.work_tree).await?;
        let branch = git::current_branch(&self.work_tree).await?;
        git::reset_hard(&self.work_tree, &self.remote, &branch).await?;
        git::clean_untracked(&self.work_tree).await?;

        info!("Working copy synced to {}/{}", self.remote, branch);
        Ok(CheckoutOutcome::Synced {
            branch,
            previous: current,
            latest,
        })
    }
}

impl std::fmt::Debug for CheckoutUpdater {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutUpdater")
            .field("work_tree", &self.work_tree)
            .field("remote", &self.remote)
            .field("version_file", &self.version_file)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}
