// SPDX-License-Identifier: MIT

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rig - declarative workstation package and dotfile manager

mod app;
mod color;
mod commands;
mod env;
mod exit_error;
mod output;
mod reporter;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{apply, info, install, managers, search, status, uninstall, upgrade};
use output::OutputFormat;

#[derive(Parser)]
#[command(
    name = "rig",
    version,
    about = "rig - bring a workstation to its declared state",
    styles = color::styles()
)]
struct Cli {
    /// Output format
    #[arg(
        short = 'o',
        long = "output",
        value_enum,
        default_value_t,
        global = true
    )]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile and apply the declared state
    Apply(apply::ApplyArgs),
    /// Report managed / missing / untracked state without applying
    Status(status::StatusArgs),
    /// Install packages and record them in the lock
    Install(install::InstallArgs),
    /// Uninstall packages and drop them from the lock
    Uninstall(uninstall::UninstallArgs),
    /// Search package managers for a name
    Search(search::SearchArgs),
    /// Show details for one package
    Info(info::InfoArgs),
    /// Upgrade managed packages
    Upgrade(upgrade::UpgradeArgs),
    /// List registered package managers
    Managers(managers::ManagersArgs),
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(e) = run().await {
        let code = e
            .downcast_ref::<exit_error::ExitError>()
            .map_or(1, |c| c.code);
        let msg = e.to_string();
        if !msg.is_empty() {
            eprintln!("Error: {}", msg);
        }
        std::process::exit(code);
    }
}

/// RIG_LOG controls tracing (e.g. RIG_LOG=debug); silent by default so
/// user-facing output stays clean.
fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_env("RIG_LOG").unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let format = cli.output;

    let code = match cli.command {
        Commands::Apply(args) => apply::run(args, format).await?,
        Commands::Status(args) => status::run(args, format).await?,
        Commands::Install(args) => install::run(args, format).await?,
        Commands::Uninstall(args) => uninstall::run(args, format).await?,
        Commands::Search(args) => search::run(args, format).await?,
        Commands::Info(args) => info::run(args, format).await?,
        Commands::Upgrade(args) => upgrade::run(args, format).await?,
        Commands::Managers(args) => managers::run(args, format).await?,
    };
    if code != 0 {
        return Err(exit_error::ExitError::new(code).into());
    }
    Ok(())
}
