//! Remote release source
//!
//! Releases are published as plain files next to each other on a raw-file
//! host: `{base}/version.txt` holds the latest version and
//! `{base}/{artifact}` the per-platform binaries.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::download::{join_url, HttpFetcher};
use crate::error::Result;
use crate::platform::ArtifactName;
use crate::version::SemVer;

/// Name of the version file on the remote
pub const VERSION_FILE: &str = "version.txt";

/// Reads the latest version and artifacts from a raw-file base URL
#[derive(Clone)]
pub struct RemoteVersionSource {
    /// Transport
    fetcher: Arc<dyn HttpFetcher>,

    /// Base URL, without trailing slash
    base_url: String,
}

impl RemoteVersionSource {
    /// Create a source for `base_url`
    pub fn new(fetcher: Arc<dyn HttpFetcher>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { fetcher, base_url }
    }

    /// The base URL releases are resolved against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the trimmed contents of `version.txt`.
    ///
    /// Any transport failure yields the sentinel `"0.0.0"` so that a
    /// flaky network reads as "no update available".
    pub async fn fetch_latest_version_text(&self) -> String {
        let url = join_url(&self.base_url, VERSION_FILE);
        debug!("Fetching version from: {}", url);

        match self.fetcher.fetch_text(&url).await {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                warn!("Error retrieving latest version: {}", e);
                SemVer::SENTINEL.to_string()
            }
        }
    }

    /// Fetch and parse the latest version, sentinel on any failure
    pub async fn latest_version(&self) -> SemVer {
        SemVer::parse_or_sentinel(&self.fetch_latest_version_text().await)
    }

    /// URL of an artifact on this source
    pub fn artifact_url(&self, artifact: &ArtifactName) -> String {
        join_url(&self.base_url, artifact.as_str())
    }

    /// Download an artifact; transport failures propagate
    pub async fn fetch_artifact_bytes(&self, artifact: &ArtifactName) -> Result<Vec<u8>> {
        let url = self.artifact_url(artifact);
        info!("Downloading update from: {}", url);
        self.fetcher.fetch_bytes(&url).await
    }
}

impl std::fmt::Debug for RemoteVersionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteVersionSource")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
