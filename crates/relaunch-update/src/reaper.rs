//! Deferred deletion of the binary replaced by the previous update
//!
//! The update cycle records the old executable's path in a marker file and
//! exits. On the next start, [`StaleVersionReaper::reap_if_pending`] removes
//! the marker first and only then the recorded file, so a deletion that
//! keeps failing is never retried forever.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Result of a reaper pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReapOutcome {
    /// No marker present
    NothingPending,

    /// Marker present but empty or unreadable; marker removed
    EmptyMarker,

    /// Recorded binary no longer exists; marker removed
    AlreadyGone { path: PathBuf },

    /// Recorded binary deleted
    Deleted { path: PathBuf },

    /// Recorded binary could not be deleted; marker removed anyway
    DeleteFailed { path: PathBuf, reason: String },
}

/// Deletes the binary recorded in the marker file
#[derive(Debug, Clone)]
pub struct StaleVersionReaper {
    /// Marker path
    marker_path: PathBuf,

    /// Pause before deleting, lets the old process release its handle
    settle_delay: Duration,
}

impl StaleVersionReaper {
    /// Create a reaper for `marker_path`
    pub fn new(marker_path: impl Into<PathBuf>, settle_delay: Duration) -> Self {
        Self {
            marker_path: marker_path.into(),
            settle_delay,
        }
    }

    /// The marker file this reaper consumes
    pub fn marker_path(&self) -> &Path {
        &self.marker_path
    }

    /// Consume a pending marker, if any. Never fails; problems are logged.
    pub async fn reap_if_pending(&self) -> ReapOutcome {
        let content = match tokio::fs::read_to_string(&self.marker_path).await {
            Ok(content) => Some(content),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No update marker at {}", self.marker_path.display());
                return ReapOutcome::NothingPending;
            }
            Err(e) => {
                warn!(
                    "Could not read update marker {}: {}",
                    self.marker_path.display(),
                    e
                );
                None
            }
        };

        // Marker goes first, whatever happens to the stale binary
        if let Err(e) = tokio::fs::remove_file(&self.marker_path).await {
            warn!(
                "Failed to remove update marker {}: {}",
                self.marker_path.display(),
                e
            );
        }

        let recorded = content.as_deref().map(str::trim).unwrap_or_default();
        if recorded.is_empty() {
            warn!("Update marker was empty, nothing to clean up");
            return ReapOutcome::EmptyMarker;
        }

        let stale = PathBuf::from(recorded);
        if !tokio::fs::try_exists(&stale).await.unwrap_or(false) {
            info!(
                "Previous version {} is already gone, nothing to delete",
                stale.display()
            );
            return ReapOutcome::AlreadyGone { path: stale };
        }

        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }

        match tokio::fs::remove_file(&stale).await {
            Ok(()) => {
                info!("Successfully deleted {}", stale.display());
                ReapOutcome::Deleted { path: stale }
            }
            Err(e) => {
                warn!("Failed to delete previous version {}: {}", stale.display(), e);
                ReapOutcome::DeleteFailed {
                    path: stale,
                    reason: e.to_string(),
                }
            }
        }
    }
}
