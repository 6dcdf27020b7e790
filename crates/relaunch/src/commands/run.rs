//! Run command: reap, then one full update cycle

use anyhow::Result;
use camino::Utf8Path;
use relaunch_update::{
    reap_then_update, Confirmation, FixedAnswer, ReplacementCoordinator, UpdateOutcome,
};
use std::sync::Arc;

use super::reap;
use crate::cli::RunArgs;
use crate::output;
use crate::prompt::DialoguerPrompt;
use crate::utils::{current_version, fetcher, load_config};

pub async fn run(args: RunArgs, config_path: Option<&Utf8Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let current = current_version(args.current_version.as_deref())?;

    let confirmation: Arc<dyn Confirmation> = if args.yes {
        Arc::new(FixedAnswer(true))
    } else {
        Arc::new(DialoguerPrompt)
    };

    let reaper = reap::reaper(&config);
    let coordinator = ReplacementCoordinator::from_config(&config, current, fetcher(&config)?)?
        .with_confirmation(confirmation);

    let (reaped, outcome) = reap_then_update(&reaper, &coordinator).await;
    reap::report(&reaped, false);

    if let UpdateOutcome::Exited {
        artifact,
        version,
        relaunched,
    } = &outcome
    {
        if *relaunched {
            output::success(&format!("Updated to {}, starting {}", version, artifact.display()));
        } else {
            output::warning(&format!(
                "Updated to {} but it could not be started. Run {} manually",
                version,
                artifact.display()
            ));
        }
    }

    match outcome.exit_if_replaced() {
        UpdateOutcome::UpToDate { current, .. } => {
            output::success(&format!("{} {} is up to date", config.app.name, current));
        }
        UpdateOutcome::Declined { latest, .. } => {
            output::info(&format!("Skipped update to {}", latest));
        }
        UpdateOutcome::Failed { stage, error } => {
            output::error(&format!("Update failed during {}: {}", stage, error));
            output::info("Continuing with the current version");
        }
        UpdateOutcome::Exited { .. } => {}
    }

    Ok(())
}
