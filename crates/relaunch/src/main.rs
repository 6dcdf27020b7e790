//! relaunch - self-updating launcher
//!
//! On every start the binary removes the version it replaced last time,
//! then checks the release host for a newer build. An accepted update is
//! written next to the running binary, started detached, and this process
//! exits.

mod cli;
mod commands;
mod output;
mod prompt;
mod utils;
mod version;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize rustls crypto provider (required for rustls 0.23+)
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let mut cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    let command = cli.take_command();
    let config = cli.config.as_deref();
    match command {
        Commands::Run(args) => commands::run::run(args, config).await,
        Commands::Check(args) => commands::check::run(args, config).await,
        Commands::Reap => commands::reap::run(config).await,
        Commands::Sync(args) => commands::sync::run(args, config).await,
        Commands::Platform(args) => commands::platform::run(args, config).await,
        Commands::Version(args) => commands::version::run(args),
    }
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
