// SPDX-License-Identifier: MIT

//! `rig apply`

use crate::app::App;
use crate::output::{self, OutputFormat};
use clap::Args;
use rig_engine::Scope;

#[derive(Args)]
pub struct ApplyArgs {
    /// Report what would change without touching anything
    #[arg(long, short = 'n')]
    pub dry_run: bool,

    /// Only reconcile packages
    #[arg(long, conflicts_with = "dotfiles")]
    pub packages: bool,

    /// Only reconcile dotfiles
    #[arg(long, conflicts_with = "packages")]
    pub dotfiles: bool,
}

impl ApplyArgs {
    pub fn scope(&self) -> Scope {
        if self.packages {
            Scope::Packages
        } else if self.dotfiles {
            Scope::Dotfiles
        } else {
            Scope::All
        }
    }
}

pub async fn run(args: ApplyArgs, format: OutputFormat) -> anyhow::Result<i32> {
    let app = App::load()?;
    let orchestrator = app.orchestrator(format)?;
    let ctx = app.root_ctx();

    let summary = orchestrator.apply(&ctx, args.scope(), args.dry_run).await?;
    output::render_summary(&summary, format);
    Ok(if summary.success() { 0 } else { 1 })
}
