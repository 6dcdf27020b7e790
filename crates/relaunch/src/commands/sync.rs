//! Sync command: update a git working copy

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use relaunch_update::{CheckoutOutcome, CheckoutUpdater, NetworkProbe};
use std::sync::Arc;

use crate::cli::SyncArgs;
use crate::output;
use crate::utils::{load_config, remote_source};

pub async fn run(args: SyncArgs, config_path: Option<&Utf8Path>) -> Result<()> {
    let config = load_config(config_path)?;

    let work_tree = match args.path {
        Some(path) => path,
        None => Utf8PathBuf::try_from(std::env::current_dir()?)
            .context("Current directory is not valid UTF-8")?,
    };

    let updater = CheckoutUpdater::from_config(
        &config,
        work_tree,
        remote_source(&config)?,
        Arc::new(NetworkProbe::new(&config.network)),
    );

    let spinner = output::spinner("Checking working copy...");
    let result = updater.sync().await;
    spinner.finish_and_clear();

    match result? {
        CheckoutOutcome::Offline => {
            output::warning("No internet connection; working copy left as is");
        }
        CheckoutOutcome::UpToDate { current, .. } => {
            output::success(&format!("{} is up to date ({})", updater.work_tree(), current));
        }
        CheckoutOutcome::Synced {
            branch, latest, ..
        } => {
            output::success(&format!(
                "{} synced to {} on branch {}",
                updater.work_tree(),
                latest,
                branch
            ));
        }
    }

    Ok(())
}
