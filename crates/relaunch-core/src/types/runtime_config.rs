//! Runtime configuration types for the updater
//!
//! These types describe where releases are published, how long network
//! operations may take, and where the pending-deletion marker lives.

use serde::{Deserialize, Serialize};

/// Complete updater configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct RuntimeConfig {
    /// Host application identity
    #[serde(default)]
    pub app: AppConfig,

    /// Remote release source
    #[serde(default)]
    pub source: SourceConfig,

    /// Network and HTTP configuration
    #[serde(default)]
    pub network: NetworkConfig,

    /// Marker file and reaper behaviour
    #[serde(default)]
    pub lifecycle: LifecycleConfig,

    /// Working-copy update mode
    #[serde(default)]
    pub checkout: CheckoutConfig,
}

/// Host application identity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct AppConfig {
    /// Artifact name prefix (`{name}_{platform}-{version}`)
    #[serde(default = "default_app_name")]
    pub name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
        }
    }
}

fn default_app_name() -> String {
    "relaunch".to_string()
}

/// Remote release source settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct SourceConfig {
    /// Raw-file host
    #[serde(default = "default_raw_host")]
    pub raw_host: String,

    /// Repository owner
    #[serde(default = "default_owner")]
    pub owner: String,

    /// Repository name
    #[serde(default = "default_repository")]
    pub repository: String,

    /// Branch that carries `version.txt` and the artifacts
    #[serde(default = "default_branch")]
    pub branch: String,

    /// Full base URL, bypassing host/owner/repository/branch composition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl SourceConfig {
    /// Base URL that `version.txt` and artifacts are resolved against.
    ///
    /// Never ends with a slash.
    pub fn raw_base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!(
                "{}/{}/{}/{}",
                self.raw_host.trim_end_matches('/'),
                self.owner,
                self.repository,
                self.branch
            ),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            raw_host: default_raw_host(),
            owner: default_owner(),
            repository: default_repository(),
            branch: default_branch(),
            base_url: None,
        }
    }
}

fn default_raw_host() -> String {
    "https://raw.githubusercontent.com".to_string()
}
fn default_owner() -> String {
    "relaunch-rs".to_string()
}
fn default_repository() -> String {
    "releases".to_string()
}
fn default_branch() -> String {
    "main".to_string()
}

/// Network and HTTP configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct NetworkConfig {
    /// Timeout for small text requests (`version.txt`)
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,

    /// Timeout for the artifact download
    #[serde(default = "default_download_timeout")]
    pub download_timeout_secs: u64,

    /// Timeout for each reachability probe step
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,

    /// TCP `host:port` tried first by the reachability probe
    #[serde(default = "default_probe_address")]
    pub probe_address: String,

    /// URL tried with `HEAD` when the TCP probe fails
    #[serde(default = "default_probe_url")]
    pub probe_url: String,

    /// User agent string for HTTP requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            http_timeout_secs: default_http_timeout(),
            download_timeout_secs: default_download_timeout(),
            probe_timeout_secs: default_probe_timeout(),
            probe_address: default_probe_address(),
            probe_url: default_probe_url(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_http_timeout() -> u64 {
    30
}
fn default_download_timeout() -> u64 {
    300 // 5 minutes
}
fn default_probe_timeout() -> u64 {
    3
}
fn default_probe_address() -> String {
    "github.com:443".to_string()
}
fn default_probe_url() -> String {
    "https://www.google.com".to_string()
}
fn default_user_agent() -> String {
    format!(
        "relaunch/{} ({}; {})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

/// Marker file and reaper behaviour
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct LifecycleConfig {
    /// Marker path, relative paths resolve against the working directory
    #[serde(default = "default_marker_file")]
    pub marker_file: String,

    /// Pause before deleting a stale binary, in milliseconds
    #[serde(default = "default_reap_delay")]
    pub reap_delay_ms: u64,

    /// Show a progress bar while downloading
    #[serde(default = "default_show_progress")]
    pub show_progress: bool,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            marker_file: default_marker_file(),
            reap_delay_ms: default_reap_delay(),
            show_progress: default_show_progress(),
        }
    }
}

fn default_marker_file() -> String {
    "updateInfo.txt".to_string()
}
fn default_reap_delay() -> u64 {
    1000
}
fn default_show_progress() -> bool {
    true
}

/// Working-copy update mode
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct CheckoutConfig {
    /// Remote the checked-out branch is reset to
    #[serde(default = "default_remote")]
    pub remote: String,

    /// File inside the working copy holding its version
    #[serde(default = "default_version_file")]
    pub version_file: String,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            remote: default_remote(),
            version_file: default_version_file(),
        }
    }
}

fn default_remote() -> String {
    "origin".to_string()
}
fn default_version_file() -> String {
    "version.txt".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_base_url_composition() {
        let source = SourceConfig {
            owner: "KachleGG".to_string(),
            repository: "versionControl".to_string(),
            ..Default::default()
        };
        assert_eq!(
            source.raw_base_url(),
            "https://raw.githubusercontent.com/KachleGG/versionControl/main"
        );
    }

    #[test]
    fn test_raw_base_url_override_trims_slash() {
        let source = SourceConfig {
            base_url: Some("http://127.0.0.1:8080/releases/".to_string()),
            ..Default::default()
        };
        assert_eq!(source.raw_base_url(), "http://127.0.0.1:8080/releases");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: RuntimeConfig = serde_yaml_ng::from_str(
            r#"
lifecycle:
  reap-delay-ms: 0
"#,
        )
        .unwrap();
        assert_eq!(config.lifecycle.reap_delay_ms, 0);
        assert_eq!(config.lifecycle.marker_file, "updateInfo.txt");
        assert_eq!(config.checkout.remote, "origin");
    }
}
