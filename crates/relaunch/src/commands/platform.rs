//! Platform command

use anyhow::Result;
use camino::Utf8Path;
use relaunch_update::platform::{self, ArtifactName, HostFacts, PlatformTag};
use serde::Serialize;

use crate::cli::PlatformArgs;
use crate::output;
use crate::utils::{load_config, remote_source};

#[derive(Debug, Serialize)]
struct PlatformReport {
    host: HostFacts,
    platform: PlatformTag,
    supported: bool,
    latest: Option<String>,
    artifact: Option<String>,
}

pub async fn run(args: PlatformArgs, config_path: Option<&Utf8Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let host = HostFacts::current();
    let tag = platform::detect(&host);

    let mut report = PlatformReport {
        host,
        platform: tag,
        supported: tag.is_supported(),
        latest: None,
        artifact: None,
    };

    if tag.is_supported() {
        let latest = remote_source(&config)?.latest_version().await;
        if !latest.is_sentinel() {
            report.artifact = Some(ArtifactName::new(&config.app.name, tag, &latest).to_string());
            report.latest = Some(latest.to_string());
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    output::kv("OS", &host.os.to_string());
    output::kv("Architecture", &host.arch.to_string());
    output::kv("64-bit", &host.is_64bit.to_string());
    output::kv("Platform", tag.as_str());

    match (&report.latest, &report.artifact) {
        (Some(latest), Some(artifact)) => {
            output::kv("Latest version", latest);
            output::kv("Artifact", artifact);
        }
        _ if report.supported => output::warning("Latest version could not be determined"),
        _ => output::warning("Automatic updating isn't available on this platform"),
    }

    Ok(())
}
