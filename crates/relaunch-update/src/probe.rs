//! Internet reachability probe

use async_trait::async_trait;
use relaunch_core::types::NetworkConfig;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

/// Boolean "are we online" capability
#[async_trait]
pub trait ConnectivityProbe: Send + Sync {
    async fn is_reachable(&self) -> bool;
}

/// TCP connect first, HTTP `HEAD` as fallback, each bounded by a short
/// timeout. Every failure reads as unreachable.
#[derive(Debug, Clone)]
pub struct NetworkProbe {
    /// `host:port` for the TCP attempt
    address: String,

    /// URL for the HTTP attempt
    url: String,

    /// Per-attempt timeout
    timeout: Duration,

    /// User agent for the HTTP attempt
    user_agent: String,
}

impl NetworkProbe {
    /// Build a probe from network configuration
    pub fn new(config: &NetworkConfig) -> Self {
        Self {
            address: config.probe_address.clone(),
            url: config.probe_url.clone(),
            timeout: Duration::from_secs(config.probe_timeout_secs),
            user_agent: config.user_agent.clone(),
        }
    }

    async fn tcp_reachable(&self) -> bool {
        match timeout(self.timeout, TcpStream::connect(&self.address)).await {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                debug!("TCP probe to {} failed: {}", self.address, e);
                false
            }
            Err(_) => {
                debug!("TCP probe to {} timed out", self.address);
                false
            }
        }
    }

    async fn http_reachable(&self) -> bool {
        let client = match reqwest::Client::builder()
            .user_agent(&self.user_agent)
            .timeout(self.timeout)
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                debug!("HTTP probe client could not be built: {}", e);
                return false;
            }
        };

        match client.head(&self.url).send().await {
            Ok(response) => {
                debug!("HTTP probe {} -> {}", self.url, response.status());
                true
            }
            Err(e) => {
                debug!("HTTP probe to {} failed: {}", self.url, e);
                false
            }
        }
    }
}

#[async_trait]
impl ConnectivityProbe for NetworkProbe {
    async fn is_reachable(&self) -> bool {
        self.tcp_reachable().await || self.http_reachable().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probe(address: &str, url: &str) -> NetworkProbe {
        NetworkProbe::new(&NetworkConfig {
            probe_address: address.to_string(),
            probe_url: url.to_string(),
            probe_timeout_secs: 1,
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_local_listener_is_reachable() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();

        assert!(probe(&address, "http://127.0.0.1:9/").is_reachable().await);
    }

    #[tokio::test]
    async fn test_unresolvable_targets_are_unreachable() {
        let probe = probe("host.invalid:443", "http://host.invalid/");
        assert!(!probe.is_reachable().await);
    }
}
