// SPDX-License-Identifier: MIT

//! `rig search`

use crate::app::App;
use crate::color::{self, codes};
use crate::output::OutputFormat;
use clap::Args;
use rig_adapters::PackageManager;
use std::collections::BTreeMap;

#[derive(Args)]
pub struct SearchArgs {
    /// Search term
    pub query: String,

    /// Restrict to one manager
    #[arg(long, short = 'm')]
    pub manager: Option<String>,
}

pub async fn run(args: SearchArgs, format: OutputFormat) -> anyhow::Result<i32> {
    let app = App::load()?;
    let root = app.root_ctx();
    let mut by_manager: BTreeMap<String, Vec<String>> = BTreeMap::new();

    let targets: Vec<String> = match &args.manager {
        Some(manager) => vec![manager.clone()],
        None => app.registry.names(),
    };

    for name in targets {
        let Some(manager) = app.registry.get(&name) else {
            anyhow::bail!("unknown manager: {name}");
        };
        if !manager.supports_search() {
            if args.manager.is_some() {
                anyhow::bail!("{name} does not support search");
            }
            continue;
        }
        let ctx = app.package_ctx(&root);
        if !manager.is_available(&ctx).await.unwrap_or(false) {
            continue;
        }
        match manager.search(&ctx, &args.query).await {
            Ok(found) if !found.is_empty() => {
                by_manager.insert(name, found);
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(manager = %name, error = %e, "search failed"),
        }
    }

    match format {
        OutputFormat::Json => {
            crate::output::print_json(&serde_json::json!(by_manager));
        }
        OutputFormat::Text => {
            if by_manager.is_empty() {
                println!("no results for {:?}", args.query);
            }
            let colorize = color::should_colorize();
            for (manager, found) in &by_manager {
                println!("{}", color::paint(codes::HEADER, manager, colorize));
                for name in found {
                    println!("  {name}");
                }
            }
        }
    }
    Ok(0)
}
