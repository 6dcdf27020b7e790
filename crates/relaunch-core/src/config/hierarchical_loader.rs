//! Hierarchical configuration loader with precedence
//!
//! Loads configuration from multiple sources with the following precedence (low to high):
//! 1. Embedded defaults (built into binary)
//! 2. User config (~/.relaunch/relaunch.yaml) or an explicit file
//! 3. Environment variables (RELAUNCH_* prefix)
//! 4. CLI flags (handled by caller)

use crate::error::{Error, Result};
use crate::types::RuntimeConfig;
use crate::utils::get_home_dir;
use camino::{Utf8Path, Utf8PathBuf};
use rust_embed::RustEmbed;
use serde::de::DeserializeOwned;
use std::env;
use std::fs;
use std::str::FromStr;
use tracing::debug;

/// Embedded configuration files
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/../../embedded/config/"]
#[prefix = ""]
struct EmbeddedConfigs;

/// File name of the user configuration inside the config directory
pub const CONFIG_FILE_NAME: &str = "relaunch.yaml";

/// Configuration hierarchy loader
pub struct HierarchicalConfigLoader {
    /// Base directory for configuration files
    config_dir: Utf8PathBuf,

    /// Explicit config file, replaces the one in `config_dir`
    explicit_file: Option<Utf8PathBuf>,
}

impl HierarchicalConfigLoader {
    /// Create a new hierarchical config loader rooted at ~/.relaunch
    pub fn new() -> Result<Self> {
        let config_dir = Self::get_config_dir()?;
        Ok(Self {
            config_dir,
            explicit_file: None,
        })
    }

    /// Create a loader with a custom config directory
    pub fn with_dir(config_dir: Utf8PathBuf) -> Self {
        Self {
            config_dir,
            explicit_file: None,
        }
    }

    /// Use an explicit config file instead of the one in the config directory.
    ///
    /// Unlike the default location, a missing explicit file is an error.
    pub fn with_file(mut self, file: Utf8PathBuf) -> Self {
        self.explicit_file = Some(file);
        self
    }

    /// Get the standard config directory (~/.relaunch)
    fn get_config_dir() -> Result<Utf8PathBuf> {
        let home = get_home_dir()?;
        let home = Utf8PathBuf::from_path_buf(home)
            .map_err(|_| Error::invalid_config("Home directory is not valid UTF-8"))?;
        Ok(home.join(".relaunch"))
    }

    /// Load runtime configuration with hierarchical precedence
    pub fn load_runtime_config(&self) -> Result<RuntimeConfig> {
        let mut config = Self::load_embedded_config::<RuntimeConfig>("updater-defaults.yaml")?;

        match &self.explicit_file {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::config_not_found(path.as_str()));
                }
                let file_config = self.load_yaml_file::<RuntimeConfig>(path)?;
                config = Self::merge_runtime_config(config, file_config);
            }
            None => {
                let path = self.config_dir.join(CONFIG_FILE_NAME);
                if path.exists() {
                    let file_config = self.load_yaml_file::<RuntimeConfig>(&path)?;
                    config = Self::merge_runtime_config(config, file_config);
                }
            }
        }

        self.apply_env_overrides(config)
    }

    /// Load an embedded configuration file
    fn load_embedded_config<T: DeserializeOwned>(filename: &str) -> Result<T> {
        let embedded_file = EmbeddedConfigs::get(filename).ok_or_else(|| {
            Error::config_not_found(format!("Embedded config not found: {}", filename))
        })?;

        let content = std::str::from_utf8(&embedded_file.data).map_err(|_| {
            Error::invalid_config(format!("Invalid UTF-8 in embedded config: {}", filename))
        })?;

        serde_yaml_ng::from_str(content).map_err(|e| {
            Error::invalid_config(format!(
                "Failed to parse embedded config {}: {}",
                filename, e
            ))
        })
    }

    /// Load a YAML file and parse it
    fn load_yaml_file<T: DeserializeOwned>(&self, path: &Utf8Path) -> Result<T> {
        debug!("Loading config file: {}", path);
        let content = fs::read_to_string(path)?;
        serde_yaml_ng::from_str(&content)
            .map_err(|e| Error::invalid_config(format!("Failed to parse {}: {}", path, e)))
    }

    /// Merge two runtime configs (base is overridden by overlay)
    ///
    /// Sections are replaced wholesale; missing keys inside a section fall
    /// back to their serde defaults, which mirror the embedded file.
    fn merge_runtime_config(base: RuntimeConfig, overlay: RuntimeConfig) -> RuntimeConfig {
        let source = if overlay.source.base_url.is_none() && base.source.base_url.is_some() {
            crate::types::SourceConfig {
                base_url: base.source.base_url,
                ..overlay.source
            }
        } else {
            overlay.source
        };

        RuntimeConfig {
            app: overlay.app,
            source,
            network: overlay.network,
            lifecycle: overlay.lifecycle,
            checkout: overlay.checkout,
        }
    }

    /// Apply environment variable overrides to runtime config
    fn apply_env_overrides(&self, mut config: RuntimeConfig) -> Result<RuntimeConfig> {
        if let Ok(val) = env::var("RELAUNCH_APP_NAME") {
            config.app.name = val;
        }

        // Source configuration
        if let Ok(val) = env::var("RELAUNCH_BASE_URL") {
            config.source.base_url = Some(val);
        }

        if let Ok(val) = env::var("RELAUNCH_SOURCE_OWNER") {
            config.source.owner = val;
        }

        if let Ok(val) = env::var("RELAUNCH_SOURCE_REPOSITORY") {
            config.source.repository = val;
        }

        if let Ok(val) = env::var("RELAUNCH_SOURCE_BRANCH") {
            config.source.branch = val;
        }

        // Network timeouts
        if let Some(val) = parse_env("RELAUNCH_HTTP_TIMEOUT_SECS")? {
            config.network.http_timeout_secs = val;
        }

        if let Some(val) = parse_env("RELAUNCH_DOWNLOAD_TIMEOUT_SECS")? {
            config.network.download_timeout_secs = val;
        }

        if let Some(val) = parse_env("RELAUNCH_PROBE_TIMEOUT_SECS")? {
            config.network.probe_timeout_secs = val;
        }

        // Lifecycle
        if let Ok(val) = env::var("RELAUNCH_MARKER_FILE") {
            config.lifecycle.marker_file = val;
        }

        if let Some(val) = parse_env("RELAUNCH_REAP_DELAY_MS")? {
            config.lifecycle.reap_delay_ms = val;
        }

        Ok(config)
    }

    /// Get the config directory path
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }
}

/// Read a numeric environment variable, rejecting values that do not parse
fn parse_env<T: FromStr>(key: &str) -> Result<Option<T>> {
    match env::var(key) {
        Ok(val) => val
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::invalid_config(format!("{} must be a valid number", key))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn create_temp_loader() -> (HierarchicalConfigLoader, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config_dir =
            Utf8PathBuf::from_path_buf(temp_dir.path().to_path_buf()).expect("Invalid UTF-8 path");
        let loader = HierarchicalConfigLoader::with_dir(config_dir);
        (loader, temp_dir)
    }

    #[test]
    #[serial]
    fn test_load_runtime_config_defaults() {
        let (loader, _temp) = create_temp_loader();
        let config = loader.load_runtime_config().unwrap();
        assert_eq!(config.lifecycle.marker_file, "updateInfo.txt");
        assert_eq!(config.lifecycle.reap_delay_ms, 1000);
        assert_eq!(config.network.probe_timeout_secs, 3);
        assert_eq!(config.source.branch, "main");
    }

    #[test]
    #[serial]
    fn test_load_runtime_config_from_file() {
        let (loader, _temp) = create_temp_loader();

        let config_content = r#"
app:
  name: Updatr
source:
  owner: KachleGG
  repository: versionControl
network:
  http-timeout-secs: 5
"#;
        let config_path = loader.config_dir().join(CONFIG_FILE_NAME);
        fs::write(&config_path, config_content).unwrap();

        let config = loader.load_runtime_config().unwrap();
        assert_eq!(config.app.name, "Updatr");
        assert_eq!(config.network.http_timeout_secs, 5);
        assert_eq!(
            config.source.raw_base_url(),
            "https://raw.githubusercontent.com/KachleGG/versionControl/main"
        );
    }

    #[test]
    #[serial]
    fn test_explicit_file_must_exist() {
        let (loader, temp) = create_temp_loader();
        let missing = Utf8PathBuf::from_path_buf(temp.path().join("missing.yaml")).unwrap();
        let loader = loader.with_file(missing);

        let err = loader.load_runtime_config().unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound { .. }));
    }

    #[test]
    #[serial]
    fn test_explicit_file_replaces_default_location() {
        let (loader, temp) = create_temp_loader();
        fs::write(
            loader.config_dir().join(CONFIG_FILE_NAME),
            "app:\n  name: from-dir\n",
        )
        .unwrap();
        let explicit = Utf8PathBuf::from_path_buf(temp.path().join("explicit.yaml")).unwrap();
        fs::write(&explicit, "app:\n  name: from-flag\n").unwrap();

        let config = loader.with_file(explicit).load_runtime_config().unwrap();
        assert_eq!(config.app.name, "from-flag");
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        let (loader, _temp) = create_temp_loader();

        env::set_var("RELAUNCH_BASE_URL", "http://localhost:9000/rel");
        env::set_var("RELAUNCH_REAP_DELAY_MS", "0");
        env::set_var("RELAUNCH_MARKER_FILE", "/tmp/marker.txt");

        let config = loader.load_runtime_config().unwrap();
        assert_eq!(config.source.raw_base_url(), "http://localhost:9000/rel");
        assert_eq!(config.lifecycle.reap_delay_ms, 0);
        assert_eq!(config.lifecycle.marker_file, "/tmp/marker.txt");

        env::remove_var("RELAUNCH_BASE_URL");
        env::remove_var("RELAUNCH_REAP_DELAY_MS");
        env::remove_var("RELAUNCH_MARKER_FILE");
    }

    #[test]
    #[serial]
    fn test_env_override_rejects_non_numeric() {
        let (loader, _temp) = create_temp_loader();

        env::set_var("RELAUNCH_PROBE_TIMEOUT_SECS", "soon");
        let result = loader.load_runtime_config();
        env::remove_var("RELAUNCH_PROBE_TIMEOUT_SECS");

        assert!(matches!(result, Err(Error::InvalidConfig { .. })));
    }

    #[test]
    fn test_merge_keeps_base_url_override() {
        let mut base = RuntimeConfig::default();
        base.source.base_url = Some("http://mirror".to_string());
        let mut overlay = RuntimeConfig::default();
        overlay.lifecycle.reap_delay_ms = 10;

        let merged = HierarchicalConfigLoader::merge_runtime_config(base, overlay);
        assert_eq!(merged.source.base_url.as_deref(), Some("http://mirror"));
        assert_eq!(merged.lifecycle.reap_delay_ms, 10);
    }
}
