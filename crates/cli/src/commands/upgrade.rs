// SPDX-License-Identifier: MIT

//! `rig upgrade`

use crate::app::{split_spec, App};
use crate::output::OutputFormat;
use clap::Args;
use rig_adapters::PackageManager;
use std::collections::BTreeMap;

#[derive(Args)]
pub struct UpgradeArgs {
    /// Packages as `name` or `manager:name`; empty upgrades everything in
    /// the lock
    pub specs: Vec<String>,
}

pub async fn run(args: UpgradeArgs, format: OutputFormat) -> anyhow::Result<i32> {
    let app = App::load()?;
    let root = app.root_ctx();

    // Group requested names by manager; no arguments means every locked
    // package of every manager.
    let mut by_manager: BTreeMap<String, Vec<String>> = BTreeMap::new();
    if args.specs.is_empty() {
        for entry in app.lock.read()?.resources {
            by_manager
                .entry(entry.manager().to_string())
                .or_default()
                .push(entry.name().to_string());
        }
    } else {
        for spec in &args.specs {
            let (manager, package) = split_spec(spec, &app.config.default_manager);
            by_manager
                .entry(manager.to_string())
                .or_default()
                .push(package.to_string());
        }
    }

    let mut failures = Vec::new();
    let mut upgraded: Vec<String> = Vec::new();
    for (manager_name, names) in &by_manager {
        let Some(manager) = app.registry.get(manager_name) else {
            failures.push(format!("unknown manager: {manager_name}"));
            continue;
        };
        let ctx = app.package_ctx(&root);
        if !manager.is_available(&ctx).await.unwrap_or(false) {
            failures.push(format!(
                "{manager_name} is not available. {}",
                manager.install_hint()
            ));
            continue;
        }
        match manager.upgrade(&ctx, names).await {
            Ok(()) => {
                upgraded.extend(names.iter().map(|n| format!("{manager_name}:{n}")));
                // Refresh locked versions best-effort.
                for name in names {
                    if let Ok(version) = manager.installed_version(&ctx, name).await {
                        let _ = app.lock.add_package(
                            manager_name,
                            name,
                            Some(&version),
                            BTreeMap::new(),
                        );
                    }
                }
            }
            Err(e) => failures.push(format!("{manager_name}: {e}")),
        }
    }

    match format {
        OutputFormat::Json => crate::output::print_json(&serde_json::json!({
            "upgraded": upgraded,
            "failures": failures,
        })),
        OutputFormat::Text => {
            for name in &upgraded {
                println!("upgraded {name}");
            }
            for failure in &failures {
                eprintln!("Error: {failure}");
            }
            if upgraded.is_empty() && failures.is_empty() {
                println!("nothing to upgrade");
            }
        }
    }
    Ok(if failures.is_empty() { 0 } else { 1 })
}
