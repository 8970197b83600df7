// SPDX-License-Identifier: MIT

//! `rig managers`

use crate::app::App;
use crate::color::{self, codes};
use crate::output::OutputFormat;
use clap::Args;
use rig_adapters::PackageManager;

#[derive(Args)]
pub struct ManagersArgs {}

pub async fn run(_args: ManagersArgs, format: OutputFormat) -> anyhow::Result<i32> {
    let app = App::load()?;
    let root = app.root_ctx();
    let mut rows = Vec::new();

    for name in app.registry.names() {
        let Some(manager) = app.registry.get(&name) else {
            continue;
        };
        let ctx = app.package_ctx(&root);
        let available = manager.is_available(&ctx).await.unwrap_or(false);
        rows.push((name, available, manager.dependencies(), manager.install_hint()));
    }

    match format {
        OutputFormat::Json => {
            let value: Vec<serde_json::Value> = rows
                .iter()
                .map(|(name, available, deps, hint)| {
                    serde_json::json!({
                        "name": name,
                        "available": available,
                        "depends_on": deps,
                        "install_hint": hint,
                    })
                })
                .collect();
            crate::output::print_json(&serde_json::json!(value));
        }
        OutputFormat::Text => {
            let colorize = color::should_colorize();
            for (name, available, deps, hint) in &rows {
                let mark = if *available {
                    color::paint(codes::OK, "✓", colorize)
                } else {
                    color::paint(codes::MUTED, "-", colorize)
                };
                let mut line = format!("{mark} {name}");
                if !deps.is_empty() {
                    line.push_str(&format!(" (needs {})", deps.join(", ")));
                }
                if !available {
                    line.push_str(&format!(
                        " {}",
                        color::paint(codes::CONTEXT, hint, colorize)
                    ));
                }
                println!("{line}");
            }
        }
    }
    Ok(0)
}
