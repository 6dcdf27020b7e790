//! Test doubles for the update capabilities

use async_trait::async_trait;
use relaunch_core::types::NetworkConfig;
use relaunch_update::error::{Error, Result};
use relaunch_update::launcher::ProcessLauncher;
use relaunch_update::platform::HostFacts;
use relaunch_update::probe::ConnectivityProbe;
use relaunch_update::prompt::FixedAnswer;
use relaunch_update::releases::RemoteVersionSource;
use relaunch_update::updater::{ExecutableLocation, ReplacementCoordinator};
use relaunch_update::version::SemVer;
use relaunch_update::ReqwestFetcher;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use super::constants::*;

/// Records spawn requests instead of starting processes
#[derive(Debug, Default)]
pub struct RecordingLauncher {
    spawned: Mutex<Vec<PathBuf>>,
    fail: bool,
}

impl RecordingLauncher {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn spawned(&self) -> Vec<PathBuf> {
        self.spawned.lock().unwrap().clone()
    }
}

impl ProcessLauncher for RecordingLauncher {
    fn spawn_detached(&self, program: &Path) -> Result<u32> {
        self.spawned.lock().unwrap().push(program.to_path_buf());
        if self.fail {
            return Err(Error::process_spawn(
                program,
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "spawn refused"),
            ));
        }
        Ok(4242)
    }
}

/// Probe with a fixed answer
#[derive(Debug, Clone, Copy)]
pub struct FixedProbe(pub bool);

#[async_trait]
impl ConnectivityProbe for FixedProbe {
    async fn is_reachable(&self) -> bool {
        self.0
    }
}

/// Source backed by the real reqwest fetcher against `base_url`
pub fn remote_source(base_url: &str) -> RemoteVersionSource {
    let config = NetworkConfig {
        http_timeout_secs: 5,
        download_timeout_secs: 5,
        ..Default::default()
    };
    let fetcher = ReqwestFetcher::new(&config).unwrap();
    RemoteVersionSource::new(Arc::new(fetcher), base_url)
}

/// An install directory holding a fake running executable
pub struct InstallDir {
    pub temp: TempDir,
    pub executable: PathBuf,
    pub marker: PathBuf,
}

impl InstallDir {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let executable = temp.path().join(format!("{}_linux-x64-{}", APP_NAME, VERSION_1_0_7));
        std::fs::write(&executable, OLD_BINARY_CONTENT).unwrap();
        let marker = temp.path().join("updateInfo.txt");
        Self {
            temp,
            executable,
            marker,
        }
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// Coordinator for version 1.0.7 of the fake executable
    pub fn coordinator(
        &self,
        base_url: &str,
        host: HostFacts,
        accept: bool,
        launcher: Arc<RecordingLauncher>,
    ) -> ReplacementCoordinator {
        ReplacementCoordinator::new(
            APP_NAME,
            SemVer::parse(VERSION_1_0_7).unwrap(),
            remote_source(base_url),
        )
        .unwrap()
        .with_host(host)
        .with_executable(ExecutableLocation::from_path(&self.executable).unwrap())
        .with_marker_path(&self.marker)
        .with_confirmation(Arc::new(FixedAnswer(accept)))
        .with_launcher(launcher)
    }

    /// File names in the install directory, sorted
    pub fn entries(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}
