// SPDX-License-Identifier: MIT

//! `rig status`

use crate::app::App;
use crate::output::{self, OutputFormat};
use clap::Args;
use rig_engine::Scope;

#[derive(Args)]
pub struct StatusArgs {
    /// Only report packages
    #[arg(long, conflicts_with = "dotfiles")]
    pub packages: bool,

    /// Only report dotfiles
    #[arg(long, conflicts_with = "packages")]
    pub dotfiles: bool,

    /// Exit non-zero when anything is missing or drifted
    #[arg(long)]
    pub check: bool,
}

impl StatusArgs {
    fn scope(&self) -> Scope {
        if self.packages {
            Scope::Packages
        } else if self.dotfiles {
            Scope::Dotfiles
        } else {
            Scope::All
        }
    }
}

pub async fn run(args: StatusArgs, format: OutputFormat) -> anyhow::Result<i32> {
    let app = App::load()?;
    let orchestrator = app.orchestrator(format)?;
    let ctx = app.root_ctx();

    let reports = orchestrator.status(&ctx, args.scope()).await?;
    output::render_status(&reports, format);

    if args.check && reports.iter().any(|r| !r.is_converged()) {
        return Ok(1);
    }
    Ok(0)
}
