//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// relaunch - self-updating launcher
#[derive(Parser, Debug)]
#[command(name = "relaunch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to relaunch.yaml config file
    #[arg(short, long, global = true)]
    pub config: Option<Utf8PathBuf>,

    /// Defaults to `run`, which is how a relaunched update starts
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// The requested command, `run` when none was given
    pub fn take_command(&mut self) -> Commands {
        self.command
            .take()
            .unwrap_or_else(|| Commands::Run(RunArgs::default()))
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Remove the replaced binary, then check for and install an update
    Run(RunArgs),

    /// Check for a newer version without installing
    Check(CheckArgs),

    /// Remove the binary replaced by the previous update
    Reap,

    /// Update a git working copy instead of a binary
    Sync(SyncArgs),

    /// Show the detected platform and artifact name
    Platform(PlatformArgs),

    /// Show version information
    Version(VersionArgs),
}

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Install without asking
    #[arg(short, long)]
    pub yes: bool,

    /// Version to compare against instead of this build's
    #[arg(long, env = "RELAUNCH_CURRENT_VERSION")]
    pub current_version: Option<String>,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Version to compare against instead of this build's
    #[arg(long, env = "RELAUNCH_CURRENT_VERSION")]
    pub current_version: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Working copy to update (defaults to the current directory)
    #[arg(short, long)]
    pub path: Option<Utf8PathBuf>,
}

#[derive(Args, Debug)]
pub struct PlatformArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
