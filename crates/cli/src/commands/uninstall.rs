// SPDX-License-Identifier: MIT

//! `rig uninstall`

use crate::app::{split_spec, App};
use crate::output::OutputFormat;
use crate::reporter::TerminalReporter;
use clap::Args;
use rig_adapters::PackageManager;
use rig_core::{Domain, ItemStatus, OperationResult, Reporter};

#[derive(Args)]
pub struct UninstallArgs {
    /// Packages as `name` or `manager:name`
    #[arg(required = true)]
    pub specs: Vec<String>,
}

pub async fn run(args: UninstallArgs, format: OutputFormat) -> anyhow::Result<i32> {
    let app = App::load()?;
    let reporter = TerminalReporter::new();
    let root = app.root_ctx();
    let mut results = Vec::new();

    for spec in &args.specs {
        let result = uninstall_one(&app, &root, spec).await;
        if format == OutputFormat::Text {
            reporter.item_result(&result);
        }
        results.push(result);
    }

    let failed = results.iter().filter(|r| r.status.is_failure()).count();
    if format == OutputFormat::Json {
        crate::output::print_json(&serde_json::json!({ "results": results }));
    }
    Ok(if failed == 0 { 0 } else { 1 })
}

/// Resolve the owning manager: an explicit `manager:` prefix wins; a bare
/// name is looked up in the lock and must match exactly one manager.
fn resolve_manager(app: &App, spec: &str) -> Result<(String, String), OperationResult> {
    let (manager, package) = split_spec(spec, "");
    if !manager.is_empty() {
        return Ok((manager.to_string(), package.to_string()));
    }

    let found = match app.lock.find_package(package) {
        Ok(found) => found,
        Err(e) => {
            return Err(OperationResult::failed(
                package,
                Domain::Package,
                "io",
                e.to_string(),
            ))
        }
    };
    match found.as_slice() {
        [] => Err(OperationResult::failed(
            package,
            Domain::Package,
            "package-not-found",
            format!("{package} is not in the lock"),
        )
        .with_suggestion(format!("use an explicit prefix, e.g. brew:{package}"))),
        [entry] => Ok((entry.manager().to_string(), entry.name().to_string())),
        entries => {
            let managers: Vec<&str> = entries.iter().map(|e| e.manager()).collect();
            Err(OperationResult::failed(
                package,
                Domain::Package,
                "dependency-conflict",
                format!("{package} is managed by multiple managers: {}", managers.join(", ")),
            )
            .with_suggestion(format!("qualify the name, e.g. {}:{package}", managers[0])))
        }
    }
}

async fn uninstall_one(app: &App, root: &rig_core::OpCtx, spec: &str) -> OperationResult {
    let (manager_name, package) = match resolve_manager(app, spec) {
        Ok(resolved) => resolved,
        Err(result) => return result,
    };
    let Some(manager) = app.registry.get(&manager_name) else {
        return OperationResult::failed(
            &package,
            Domain::Package,
            "manager-unavailable",
            format!("unknown manager: {manager_name}"),
        );
    };
    let ctx = app.package_ctx(root);

    if let Err(e) = manager.uninstall(&ctx, &package).await {
        let mut result =
            OperationResult::failed(&package, Domain::Package, e.kind(), e.to_string())
                .with_manager(&manager_name);
        result.suggestion = e.suggestion();
        return result;
    }

    match app.lock.remove_package(&manager_name, &package) {
        Ok(()) => OperationResult::ok(&package, Domain::Package, ItemStatus::Removed)
            .with_manager(&manager_name),
        Err(e) => {
            let mut result =
                OperationResult::ok(&package, Domain::Package, ItemStatus::Removed)
                    .with_manager(&manager_name);
            result.error = Some(format!("removed, but the lock update failed: {e}"));
            result
        }
    }
}
