//! HTTP transport for version text and artifact downloads
//!
//! The update protocol only needs two operations, "fetch text" and "fetch
//! bytes", expressed by [`HttpFetcher`]. [`ReqwestFetcher`] implements them
//! with reqwest, bounded by the configured timeouts, and streams artifact
//! bodies through an optional indicatif progress bar.

use async_trait::async_trait;
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use relaunch_core::types::NetworkConfig;
use reqwest::header::CONTENT_LENGTH;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Upper bound on the buffer reserved from `Content-Length`
const MAX_PREALLOCATION: u64 = 64 * 1024 * 1024;

const PROGRESS_TEMPLATE: &str = "{msg}\n{spinner:.green} [{elapsed_precise}] \
     [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})";

/// Fetch-bytes-from-URL capability
#[async_trait]
pub trait HttpFetcher: Send + Sync {
    /// Fetch a URL as text
    async fn fetch_text(&self, url: &str) -> Result<String>;

    /// Fetch a URL as raw bytes
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>>;
}

/// reqwest-backed [`HttpFetcher`]
pub struct ReqwestFetcher {
    /// HTTP client
    client: reqwest::Client,

    /// Timeout for text requests
    text_timeout: Duration,

    /// Timeout for downloads
    download_timeout: Duration,

    /// Enable progress bars
    show_progress: bool,
}

impl ReqwestFetcher {
    /// Create a fetcher from network configuration
    pub fn new(config: &NetworkConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| Error::network("<client>", e.to_string()))?;

        Ok(Self {
            client,
            text_timeout: Duration::from_secs(config.http_timeout_secs),
            download_timeout: Duration::from_secs(config.download_timeout_secs),
            show_progress: false,
        })
    }

    /// Enable or disable progress bars
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    async fn get(&self, url: &str, timeout: Duration) -> Result<reqwest::Response> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| Error::network(url, e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::network(
                url,
                format!("server returned {}", response.status()),
            ));
        }

        Ok(response)
    }

    fn progress_bar(&self, total: Option<u64>, label: &str) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let pb = match total {
            Some(len) => ProgressBar::new(len),
            None => ProgressBar::new_spinner(),
        };
        if let Ok(style) = ProgressStyle::default_bar().template(PROGRESS_TEMPLATE) {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb.set_message(format!("Downloading {}", label));
        pb
    }
}

#[async_trait]
impl HttpFetcher for ReqwestFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        let response = self.get(url, self.text_timeout).await?;
        response
            .text()
            .await
            .map_err(|e| Error::network(url, e.to_string()))
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.get(url, self.download_timeout).await?;

        let total = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|ct| ct.to_str().ok())
            .and_then(|ct| ct.parse::<u64>().ok());

        let label = url.rsplit('/').next().unwrap_or(url);
        let progress = self.progress_bar(total, label);

        // The header is server-controlled; never reserve more than the cap
        let reserve = total.unwrap_or(0).min(MAX_PREALLOCATION) as usize;
        let mut buffer = Vec::with_capacity(reserve);
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| {
                progress.abandon();
                Error::network(url, format!("failed to read download chunk: {}", e))
            })?;
            buffer.extend_from_slice(&chunk);
            progress.set_position(buffer.len() as u64);
        }

        progress.finish_with_message(format!("Downloaded {}", label));

        if let Some(expected) = total {
            if buffer.len() as u64 != expected {
                return Err(Error::network(
                    url,
                    format!(
                        "size mismatch: expected {} bytes, got {}",
                        expected,
                        buffer.len()
                    ),
                ));
            }
        }

        info!("Downloaded {} ({})", label, human_readable_size(buffer.len() as u64));
        Ok(buffer)
    }
}

/// Join a base URL and a file name with exactly one slash
pub fn join_url(base: &str, name: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        name.trim_start_matches('/')
    )
}

/// Convert bytes to human-readable size
pub fn human_readable_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    format!("{:.2} {}", size, UNITS[unit_index])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_readable_size() {
        assert_eq!(human_readable_size(0), "0.00 B");
        assert_eq!(human_readable_size(1023), "1023.00 B");
        assert_eq!(human_readable_size(1024), "1.00 KB");
        assert_eq!(human_readable_size(1024 * 1024), "1.00 MB");
    }

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("http://h/a", "version.txt"), "http://h/a/version.txt");
        assert_eq!(join_url("http://h/a/", "version.txt"), "http://h/a/version.txt");
        assert_eq!(join_url("http://h/a/", "/x"), "http://h/a/x");
    }

    #[tokio::test]
    async fn test_oversized_content_length_is_a_network_error() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 1024];
            let _ = socket.read(&mut request).await;
            let _ = socket
                .write_all(
                    b"HTTP/1.1 200 OK\r\nContent-Length: 4611686018427387904\r\n\
                      Connection: close\r\n\r\nabc",
                )
                .await;
        });

        let fetcher = ReqwestFetcher::new(&NetworkConfig::default()).unwrap();
        let result = fetcher
            .fetch_bytes(&format!("http://{}/Updatr_linux-x64-1.0.8", address))
            .await;

        assert!(matches!(result, Err(Error::Network { .. })));
    }

    #[test]
    fn test_fetcher_from_default_config() {
        let fetcher = ReqwestFetcher::new(&NetworkConfig::default()).unwrap();
        assert_eq!(fetcher.text_timeout, Duration::from_secs(30));
        assert!(!fetcher.show_progress);
        assert!(fetcher.with_progress(true).show_progress);
    }
}
