// SPDX-License-Identifier: MIT

//! `rig info`

use crate::app::{split_spec, App};
use crate::output::OutputFormat;
use clap::Args;
use rig_adapters::PackageManager;

#[derive(Args)]
pub struct InfoArgs {
    /// Package as `name` or `manager:name`
    pub spec: String,
}

pub async fn run(args: InfoArgs, format: OutputFormat) -> anyhow::Result<i32> {
    let app = App::load()?;
    let (manager_name, package) = split_spec(&args.spec, &app.config.default_manager);
    let manager = app
        .registry
        .get(manager_name)
        .ok_or_else(|| anyhow::anyhow!("unknown manager: {manager_name}"))?;

    let root = app.root_ctx();
    let ctx = app.package_ctx(&root);
    if !manager.is_available(&ctx).await? {
        eprintln!("{manager_name} is not available. {}", manager.install_hint());
        return Ok(1);
    }

    match manager.info(&ctx, package).await {
        Ok(info) => {
            match format {
                OutputFormat::Json => crate::output::print_json(&serde_json::json!({
                    "name": info.name,
                    "version": info.version,
                    "description": info.description,
                    "homepage": info.homepage,
                    "dependencies": info.dependencies,
                    "installed": info.installed,
                    "manager": info.manager,
                })),
                OutputFormat::Text => {
                    println!("{} ({})", info.name, info.manager);
                    if let Some(version) = &info.version {
                        println!("  version: {version}");
                    }
                    if let Some(description) = &info.description {
                        println!("  {description}");
                    }
                    if let Some(homepage) = &info.homepage {
                        println!("  {homepage}");
                    }
                    if !info.dependencies.is_empty() {
                        println!("  depends on: {}", info.dependencies.join(", "));
                    }
                    println!("  installed: {}", if info.installed { "yes" } else { "no" });
                }
            }
            Ok(0)
        }
        Err(e) => {
            eprintln!("Error: {e}");
            Ok(1)
        }
    }
}
