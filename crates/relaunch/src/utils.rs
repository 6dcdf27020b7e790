//! Helpers shared across CLI commands

use anyhow::{Context, Result};
use camino::Utf8Path;
use relaunch_core::{HierarchicalConfigLoader, RuntimeConfig};
use relaunch_update::{RemoteVersionSource, ReqwestFetcher, SemVer};
use std::sync::Arc;

/// Version of this build
pub const BUILD_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Load runtime configuration from `path`, or from `~/.relaunch` when unset
pub fn load_config(path: Option<&Utf8Path>) -> Result<RuntimeConfig> {
    let mut loader = HierarchicalConfigLoader::new()?;
    if let Some(file) = path {
        loader = loader.with_file(file.to_path_buf());
    }
    loader
        .load_runtime_config()
        .context("Failed to load relaunch configuration")
}

/// Version to compare against: the override when given, else this build
pub fn current_version(override_version: Option<&str>) -> Result<SemVer> {
    let text = override_version.unwrap_or(BUILD_VERSION);
    SemVer::parse(text).with_context(|| format!("Invalid current version '{}'", text))
}

/// HTTP transport configured from `config`
pub fn fetcher(config: &RuntimeConfig) -> Result<Arc<ReqwestFetcher>> {
    let fetcher =
        ReqwestFetcher::new(&config.network)?.with_progress(config.lifecycle.show_progress);
    Ok(Arc::new(fetcher))
}

/// Remote release source for `config`
pub fn remote_source(config: &RuntimeConfig) -> Result<RemoteVersionSource> {
    Ok(RemoteVersionSource::new(
        fetcher(config)?,
        config.source.raw_base_url(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_version_defaults_to_build() {
        assert_eq!(current_version(None).unwrap().to_string(), BUILD_VERSION);
    }

    #[test]
    fn test_current_version_override() {
        assert_eq!(
            current_version(Some("2.3.4")).unwrap(),
            SemVer::new(2, 3, 4)
        );
        assert!(current_version(Some("2.3")).is_err());
    }

    #[test]
    fn test_explicit_missing_config_fails() {
        let temp = tempfile::TempDir::new().unwrap();
        let missing = camino::Utf8PathBuf::from_path_buf(temp.path().join("absent.yaml")).unwrap();
        assert!(load_config(Some(&missing)).is_err());
    }
}
