//! Git operations on a working copy

use camino::Utf8Path;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Fail with [`Error::GitNotFound`] unless `git` is on `PATH`
pub fn ensure_git_available() -> Result<()> {
    which::which("git").map(|_| ()).map_err(|_| Error::GitNotFound)
}

/// Run `git` in `path`, returning trimmed stdout
async fn git(path: &Utf8Path, args: &[&str], action: &str) -> Result<String> {
    debug!("git {} (in {})", args.join(" "), path);

    let output = Command::new("git")
        .current_dir(path)
        .args(args)
        .output()
        .await
        .map_err(|e| Error::git_operation(format!("Failed to {}: {}", action, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::git_operation(format!(
            "Failed to {}: {}",
            action,
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Check whether `path` is inside a git working tree
pub async fn is_work_tree(path: &Utf8Path) -> bool {
    matches!(
        git(path, &["rev-parse", "--is-inside-work-tree"], "inspect working copy").await,
        Ok(out) if out == "true"
    )
}

/// Fetch all remotes
pub async fn fetch_all(path: &Utf8Path) -> Result<()> {
    info!("Fetching remote refs");
    git(path, &["fetch", "--all"], "fetch remotes").await?;
    Ok(())
}

/// Name of the checked-out branch
///
/// # Errors
/// Returns error on a detached HEAD, which has no remote counterpart
pub async fn current_branch(path: &Utf8Path) -> Result<String> {
    let branch = git(path, &["branch", "--show-current"], "get current branch").await?;
    if branch.is_empty() {
        return Err(Error::git_operation(
            "HEAD is detached; check out a branch before syncing",
        ));
    }
    Ok(branch)
}

/// Hard-reset the working copy to `{remote}/{branch}`
pub async fn reset_hard(path: &Utf8Path, remote: &str, branch: &str) -> Result<()> {
    let target = format!("{}/{}", remote, branch);
    info!("Resetting to {}", target);
    git(
        path,
        &["reset", "--hard", target.as_str()],
        &format!("reset to '{}'", target),
    )
    .await?;
    Ok(())
}

/// Remove untracked files and directories
pub async fn clean_untracked(path: &Utf8Path) -> Result<()> {
    info!("Removing untracked files");
    git(path, &["clean", "-fd"], "remove untracked files").await?;
    Ok(())
}
