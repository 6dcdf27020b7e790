//! Check command

use anyhow::Result;
use camino::Utf8Path;
use relaunch_update::ReplacementCoordinator;
use serde::Serialize;

use crate::cli::CheckArgs;
use crate::output;
use crate::utils::{current_version, fetcher, load_config};

#[derive(Debug, Serialize)]
struct CheckReport {
    current: String,
    latest: String,
    platform: String,
    update_available: bool,
    artifact: Option<String>,
}

pub async fn run(args: CheckArgs, config_path: Option<&Utf8Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let current = current_version(args.current_version.as_deref())?;
    let coordinator = ReplacementCoordinator::from_config(&config, current, fetcher(&config)?)?;

    let spinner = (!args.json).then(|| output::spinner("Checking for updates..."));
    let check = coordinator.check().await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let report = CheckReport {
        current: check.current.to_string(),
        latest: check.latest.to_string(),
        platform: check.platform.to_string(),
        update_available: check.update_available(),
        artifact: check.artifact.as_ref().map(ToString::to_string),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    output::kv("Current version", &report.current);
    output::kv(
        "Latest version",
        if check.latest.is_sentinel() {
            "unknown"
        } else {
            report.latest.as_str()
        },
    );
    output::kv("Platform", &report.platform);

    if report.update_available {
        output::success(&format!("Update available: {}", report.latest));
        if let Some(artifact) = &report.artifact {
            output::kv("Artifact", artifact);
        }
        output::info("Run 'relaunch run' to install the update");
    } else if !check.platform.is_supported() {
        output::warning("Automatic updating isn't available on this platform");
    } else {
        output::success("Already on the latest version");
    }

    Ok(())
}
