//! Detached process launching and executable permissions

use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Starts a program that must outlive the current process
pub trait ProcessLauncher: Send + Sync {
    /// Spawn `program` detached and return its process id
    fn spawn_detached(&self, program: &Path) -> Result<u32>;
}

/// [`ProcessLauncher`] backed by `std::process::Command`.
///
/// The child inherits the working directory (so it finds the marker file)
/// and the terminal, but not the parent's process group, so it survives
/// the parent exiting or receiving Ctrl-C.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedLauncher;

impl ProcessLauncher for DetachedLauncher {
    fn spawn_detached(&self, program: &Path) -> Result<u32> {
        debug!("Spawning detached: {}", program.display());

        let mut command = Command::new(program);
        command
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            const CREATE_NEW_CONSOLE: u32 = 0x0000_0010;
            const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;
            command.creation_flags(CREATE_NEW_CONSOLE | CREATE_NEW_PROCESS_GROUP);
        }

        let child = command
            .spawn()
            .map_err(|e| Error::process_spawn(program, e))?;

        let pid = child.id();
        info!("Started {} (pid {})", program.display(), pid);
        Ok(pid)
    }
}

/// Mark a downloaded artifact as executable (0o755).
///
/// No-op where execute permission is implied by file creation.
pub fn make_executable(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(path)
            .map_err(|e| Error::filesystem(path, e))?
            .permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(path, perms).map_err(|e| Error::filesystem(path, e))?;
        debug!("File {} has been made executable", path.display());
    }

    #[cfg(not(unix))]
    let _ = path;

    Ok(())
}
