//! Reap command

use anyhow::Result;
use camino::Utf8Path;
use relaunch_update::{ReapOutcome, StaleVersionReaper};
use std::time::Duration;

use crate::output;
use crate::utils::load_config;

pub async fn run(config_path: Option<&Utf8Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let outcome = reaper(&config).reap_if_pending().await;
    report(&outcome, true);
    Ok(())
}

/// Reaper for the configured marker file and settle delay
pub fn reaper(config: &relaunch_core::RuntimeConfig) -> StaleVersionReaper {
    StaleVersionReaper::new(
        &config.lifecycle.marker_file,
        Duration::from_millis(config.lifecycle.reap_delay_ms),
    )
}

/// Print a reaper outcome; `NothingPending` only when `verbose_idle`
pub fn report(outcome: &ReapOutcome, verbose_idle: bool) {
    match outcome {
        ReapOutcome::NothingPending => {
            if verbose_idle {
                output::info("No previous version pending removal");
            }
        }
        ReapOutcome::EmptyMarker => output::warning("Update marker was empty; removed it"),
        ReapOutcome::AlreadyGone { path } => {
            output::info(&format!("Previous version {} was already removed", path.display()))
        }
        ReapOutcome::Deleted { path } => {
            output::success(&format!("Removed previous version {}", path.display()))
        }
        ReapOutcome::DeleteFailed { path, reason } => output::warning(&format!(
            "Could not remove previous version {}: {}",
            path.display(),
            reason
        )),
    }
}
