//! Self-replacing update protocol for relaunch
//!
//! Provides:
//! - Version comparison (`X.Y.Z`, sentinel `0.0.0` on any failure)
//! - Platform detection and artifact naming
//! - Remote version lookup and artifact download over a raw-file host
//! - Side-by-side replacement with detached relaunch
//! - Deferred removal of the replaced binary on the next start
//! - Git working-copy sync as an alternative to binary downloads

pub mod checkout;
pub mod download;
pub mod error;
pub mod launcher;
pub mod platform;
pub mod probe;
pub mod prompt;
pub mod reaper;
pub mod releases;
pub mod updater;
pub mod version;

pub use checkout::{CheckoutOutcome, CheckoutUpdater};
pub use download::{HttpFetcher, ReqwestFetcher};
pub use error::{Error, Result};
pub use launcher::{DetachedLauncher, ProcessLauncher};
pub use platform::{ArtifactName, CpuArch, HostFacts, OsFamily, PlatformTag};
pub use probe::{ConnectivityProbe, NetworkProbe};
pub use prompt::{Confirmation, FixedAnswer};
pub use reaper::{ReapOutcome, StaleVersionReaper};
pub use releases::RemoteVersionSource;
pub use updater::{
    ExecutableLocation, ReplacementCoordinator, UpdateCheck, UpdateOutcome, UpdateStage,
    UpdateState,
};
pub use version::SemVer;

/// Run the reaper to completion, then one update cycle.
///
/// The previous cycle's marker is always consumed before a new one can be
/// written.
pub async fn reap_then_update(
    reaper: &StaleVersionReaper,
    coordinator: &ReplacementCoordinator,
) -> (ReapOutcome, UpdateOutcome) {
    let reaped = reaper.reap_if_pending().await;
    let outcome = coordinator.run().await;
    (reaped, outcome)
}
