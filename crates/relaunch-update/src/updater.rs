//! Self-replacement protocol
//!
//! The running binary is never overwritten. A newer release is written
//! next to it under its version-qualified artifact name, the old path is
//! recorded in the marker file, the new binary is started detached and the
//! current process exits. The next start of either binary reaps the old
//! file (see [`crate::reaper`]).
//!
//! ```text
//! Idle -> CheckingVersion -> UpToDate
//!                         -> UpdateOffered -> Declined
//!                                          -> Downloading -> Installing -> Relaunching -> Exited
//! CheckingVersion | Downloading | Installing -> Failed
//! ```

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use relaunch_core::RuntimeConfig;

use crate::download::HttpFetcher;
use crate::error::{Error, Result};
use crate::launcher::{make_executable, DetachedLauncher, ProcessLauncher};
use crate::platform::{self, ArtifactName, HostFacts, PlatformTag};
use crate::prompt::{Confirmation, FixedAnswer};
use crate::releases::RemoteVersionSource;
use crate::version::{is_newer, SemVer};

/// States of one update cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateState {
    Idle,
    CheckingVersion,
    UpToDate,
    UpdateOffered,
    Declined,
    Downloading,
    Installing,
    Relaunching,
    Exited,
    Failed,
}

impl fmt::Display for UpdateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// States an update can fail in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStage {
    CheckingVersion,
    Downloading,
    Installing,
}

impl fmt::Display for UpdateStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CheckingVersion => write!(f, "version check"),
            Self::Downloading => write!(f, "download"),
            Self::Installing => write!(f, "install"),
        }
    }
}

/// Terminal result of [`ReplacementCoordinator::run`]
#[derive(Debug)]
pub enum UpdateOutcome {
    /// Remote is not newer; the host keeps running
    UpToDate { current: SemVer, latest: SemVer },

    /// The offer was not accepted; nothing was written
    Declined { current: SemVer, latest: SemVer },

    /// New binary installed; the current process must exit with code 0
    Exited {
        artifact: PathBuf,
        version: SemVer,
        /// Whether the detached relaunch could be started
        relaunched: bool,
    },

    /// Update aborted; the current binary is untouched and keeps running
    Failed { stage: UpdateStage, error: Error },
}

impl UpdateOutcome {
    /// The state the cycle ended in
    pub fn state(&self) -> UpdateState {
        match self {
            Self::UpToDate { .. } => UpdateState::UpToDate,
            Self::Declined { .. } => UpdateState::Declined,
            Self::Exited { .. } => UpdateState::Exited,
            Self::Failed { .. } => UpdateState::Failed,
        }
    }

    /// Whether the host process must terminate now
    pub fn requires_exit(&self) -> bool {
        matches!(self, Self::Exited { .. })
    }

    /// Terminate with exit code 0 after a replacement, otherwise hand the
    /// outcome back to the host.
    pub fn exit_if_replaced(self) -> Self {
        if self.requires_exit() {
            info!("Exiting so the previous version can be removed");
            std::process::exit(0);
        }
        self
    }
}

/// Result of the read-only check phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCheck {
    pub current: SemVer,
    pub latest: SemVer,
    pub platform: PlatformTag,
    /// Artifact for `latest` on this platform, when the platform is supported
    pub artifact: Option<ArtifactName>,
}

impl UpdateCheck {
    /// Whether an update would be offered
    pub fn update_available(&self) -> bool {
        self.platform.is_supported() && is_newer(&self.latest, &self.current)
    }
}

/// Absolute path of the running executable and its directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutableLocation {
    path: PathBuf,
    directory: PathBuf,
}

impl ExecutableLocation {
    /// Location of the current process
    pub fn current() -> Result<Self> {
        let path = std::env::current_exe()
            .map_err(|e| Error::filesystem(Path::new("<current executable>"), e))?;
        Self::from_path(path)
    }

    /// Location of an arbitrary executable path
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let directory = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .ok_or_else(|| {
                Error::filesystem(
                    &path,
                    io::Error::new(io::ErrorKind::InvalidInput, "path has no parent directory"),
                )
            })?;
        Ok(Self { path, directory })
    }

    /// Executable path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory containing the executable
    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

/// Runs one check → confirm → download → install → relaunch cycle
pub struct ReplacementCoordinator {
    /// Artifact name prefix
    app_name: String,

    /// Version of the running binary
    current_version: SemVer,

    /// Host platform facts
    host: HostFacts,

    /// Running executable
    executable: ExecutableLocation,

    /// Marker recording the binary to delete on next start
    marker_path: PathBuf,

    /// Remote releases
    source: RemoteVersionSource,

    /// User confirmation
    confirmation: Arc<dyn Confirmation>,

    /// Relaunch capability
    launcher: Arc<dyn ProcessLauncher>,
}

impl ReplacementCoordinator {
    /// Create a coordinator for the running process.
    ///
    /// Offers are declined until [`with_confirmation`](Self::with_confirmation)
    /// installs a real prompt.
    pub fn new(
        app_name: impl Into<String>,
        current_version: SemVer,
        source: RemoteVersionSource,
    ) -> Result<Self> {
        let executable = ExecutableLocation::current()?;

        debug!(
            "Updater initialized: version={}, path={:?}",
            current_version,
            executable.path()
        );

        Ok(Self {
            app_name: app_name.into(),
            current_version,
            host: HostFacts::current(),
            executable,
            marker_path: PathBuf::from("updateInfo.txt"),
            source,
            confirmation: Arc::new(FixedAnswer(false)),
            launcher: Arc::new(DetachedLauncher),
        })
    }

    /// Create a coordinator from runtime configuration
    pub fn from_config(
        config: &RuntimeConfig,
        current_version: SemVer,
        fetcher: Arc<dyn HttpFetcher>,
    ) -> Result<Self> {
        let source = RemoteVersionSource::new(fetcher, config.source.raw_base_url());
        Ok(Self::new(&config.app.name, current_version, source)?
            .with_marker_path(&config.lifecycle.marker_file))
    }

    /// Override host platform facts
    pub fn with_host(mut self, host: HostFacts) -> Self {
        self.host = host;
        self
    }

    /// Override the executable being replaced
    pub fn with_executable(mut self, executable: ExecutableLocation) -> Self {
        self.executable = executable;
        self
    }

    /// Override the marker path
    pub fn with_marker_path(mut self, marker_path: impl Into<PathBuf>) -> Self {
        self.marker_path = marker_path.into();
        self
    }

    /// Set the confirmation prompt
    pub fn with_confirmation(mut self, confirmation: Arc<dyn Confirmation>) -> Self {
        self.confirmation = confirmation;
        self
    }

    /// Set the process launcher
    pub fn with_launcher(mut self, launcher: Arc<dyn ProcessLauncher>) -> Self {
        self.launcher = launcher;
        self
    }

    /// Version of the running binary
    pub fn current_version(&self) -> &SemVer {
        &self.current_version
    }

    /// Running executable
    pub fn executable(&self) -> &ExecutableLocation {
        &self.executable
    }

    /// Marker file path
    pub fn marker_path(&self) -> &Path {
        &self.marker_path
    }

    /// Platform tag for the configured host
    pub fn platform(&self) -> PlatformTag {
        platform::detect(&self.host)
    }

    /// Read-only check: never prompts and never touches the filesystem
    pub async fn check(&self) -> UpdateCheck {
        let platform = self.platform();
        let latest = self.source.latest_version().await;
        let artifact = platform
            .is_supported()
            .then(|| ArtifactName::new(&self.app_name, platform, &latest));

        UpdateCheck {
            current: self.current_version.clone(),
            latest,
            platform,
            artifact,
        }
    }

    /// Run the full update cycle.
    ///
    /// An [`UpdateOutcome::Exited`] result means the caller must terminate
    /// (see [`UpdateOutcome::exit_if_replaced`]); every other outcome leaves
    /// the current version running.
    pub async fn run(&self) -> UpdateOutcome {
        enter(UpdateState::CheckingVersion);

        let platform = match platform::require_supported(&self.host) {
            Ok(tag) => tag,
            Err(e) => return fail(UpdateStage::CheckingVersion, e),
        };

        let current = self.current_version.clone();
        let latest = self.source.latest_version().await;

        if !is_newer(&latest, &current) {
            info!("No updates available (current {}, latest {})", current, latest);
            enter(UpdateState::UpToDate);
            return UpdateOutcome::UpToDate { current, latest };
        }

        enter(UpdateState::UpdateOffered);
        info!("Update available: {} → {}", current, latest);

        if !self.confirmation.confirm(&current, &latest) {
            info!("Update to {} declined", latest);
            enter(UpdateState::Declined);
            return UpdateOutcome::Declined { current, latest };
        }

        enter(UpdateState::Downloading);
        let artifact = ArtifactName::new(&self.app_name, platform, &latest);
        let target = match self.download(&artifact).await {
            Ok(path) => path,
            Err(e) => return fail(UpdateStage::Downloading, e),
        };

        enter(UpdateState::Installing);
        if let Err(e) = self.install(&target).await {
            return fail(UpdateStage::Installing, e);
        }

        enter(UpdateState::Relaunching);
        let relaunched = match self.launcher.spawn_detached(&target) {
            Ok(_) => true,
            Err(e) => {
                error!("Error running updated app: {}", e);
                error!("Run the updated app manually: {}", target.display());
                enter(UpdateState::Failed);
                false
            }
        };

        enter(UpdateState::Exited);
        UpdateOutcome::Exited {
            artifact: target,
            version: latest,
            relaunched,
        }
    }

    /// Fetch the artifact and place it next to the running executable
    async fn download(&self, artifact: &ArtifactName) -> Result<PathBuf> {
        let target = self.executable.directory().join(artifact.as_str());

        if target == self.executable.path() {
            return Err(Error::filesystem(
                &target,
                io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    "refusing to overwrite the running executable",
                ),
            ));
        }

        let bytes = self.source.fetch_artifact_bytes(artifact).await?;

        // Write under a temporary name so a failed write never leaves a
        // truncated binary under the artifact name
        let partial = self
            .executable
            .directory()
            .join(format!("{}.part", artifact.as_str()));

        if let Err(e) = tokio::fs::write(&partial, &bytes).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(Error::filesystem(&partial, e));
        }

        if let Err(e) = tokio::fs::rename(&partial, &target).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(Error::filesystem(&target, e));
        }

        info!("New version written to {}", target.display());
        Ok(target)
    }

    /// Record the old executable for deletion and make the new one runnable
    async fn install(&self, target: &Path) -> Result<()> {
        if tokio::fs::try_exists(&self.marker_path).await.unwrap_or(false) {
            warn!(
                "Overwriting an unreaped update marker at {}",
                self.marker_path.display()
            );
        }

        let record = format!("{}\n", self.executable.path().display());
        if let Err(e) = tokio::fs::write(&self.marker_path, record).await {
            // Without a marker the new binary would never be cleaned up
            if let Err(cleanup) = tokio::fs::remove_file(target).await {
                warn!("Could not remove {}: {}", target.display(), cleanup);
            }
            return Err(Error::filesystem(&self.marker_path, e));
        }
        debug!(
            "Recorded {} in {}",
            self.executable.path().display(),
            self.marker_path.display()
        );

        if let Err(e) = make_executable(target) {
            warn!(
                "Failed to make {} executable ({}); it may need to be started manually",
                target.display(),
                e
            );
        }

        Ok(())
    }
}

impl fmt::Debug for ReplacementCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReplacementCoordinator")
            .field("app_name", &self.app_name)
            .field("current_version", &self.current_version)
            .field("host", &self.host)
            .field("executable", &self.executable)
            .field("marker_path", &self.marker_path)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

fn enter(state: UpdateState) {
    debug!("Update state -> {}", state);
}

fn fail(stage: UpdateStage, error: Error) -> UpdateOutcome {
    error!("Error during {}: {}", stage, error);
    enter(UpdateState::Failed);
    UpdateOutcome::Failed { stage, error }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_executable_location_from_path() {
        let location = ExecutableLocation::from_path("/opt/app/Updatr_linux-x64-1.0.7").unwrap();
        assert_eq!(location.directory(), Path::new("/opt/app"));
        assert_eq!(location.path(), Path::new("/opt/app/Updatr_linux-x64-1.0.7"));
    }

    #[test]
    fn test_executable_location_requires_parent() {
        assert!(ExecutableLocation::from_path("Updatr").is_err());
    }

    #[test]
    fn test_current_executable_location() {
        let location = ExecutableLocation::current().unwrap();
        assert!(location.path().is_absolute());
        assert!(location.directory().is_dir());
    }

    #[test]
    fn test_outcome_states() {
        let v = SemVer::new(1, 0, 7);
        let up_to_date = UpdateOutcome::UpToDate {
            current: v.clone(),
            latest: v.clone(),
        };
        assert_eq!(up_to_date.state(), UpdateState::UpToDate);
        assert!(!up_to_date.requires_exit());

        let exited = UpdateOutcome::Exited {
            artifact: PathBuf::from("/tmp/x"),
            version: v,
            relaunched: false,
        };
        assert_eq!(exited.state(), UpdateState::Exited);
        assert!(exited.requires_exit());
    }

    #[test]
    fn test_update_check_requires_supported_platform() {
        let check = UpdateCheck {
            current: SemVer::new(1, 0, 7),
            latest: SemVer::new(1, 0, 8),
            platform: PlatformTag::Unsupported,
            artifact: None,
        };
        assert!(!check.update_available());

        let check = UpdateCheck {
            platform: PlatformTag::LinuxX64,
            ..check
        };
        assert!(check.update_available());
    }
}
