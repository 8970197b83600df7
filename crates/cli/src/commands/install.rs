// SPDX-License-Identifier: MIT

//! `rig install`

use crate::app::{split_spec, App};
use crate::output::OutputFormat;
use crate::reporter::TerminalReporter;
use clap::Args;
use rig_adapters::PackageManager;
use rig_core::{Domain, ItemStatus, OperationResult, Reporter};

#[derive(Args)]
pub struct InstallArgs {
    /// Packages as `name` or `manager:name`
    #[arg(required = true)]
    pub specs: Vec<String>,
}

pub async fn run(args: InstallArgs, format: OutputFormat) -> anyhow::Result<i32> {
    let app = App::load()?;
    let reporter = TerminalReporter::new();
    let root = app.root_ctx();
    let mut results = Vec::new();

    for spec in &args.specs {
        let (manager_name, package) = split_spec(spec, &app.config.default_manager);
        let result = install_one(&app, &root, manager_name, package).await;
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

async fn install_one(
    app: &App,
    root: &rig_core::OpCtx,
    manager_name: &str,
    package: &str,
) -> OperationResult {
    let Some(manager) = app.registry.get(manager_name) else {
        return OperationResult::failed(
            package,
            Domain::Package,
            "manager-unavailable",
            format!("unknown manager: {manager_name}"),
        );
    };
    let ctx = app.package_ctx(root);

    match manager.is_available(&ctx).await {
        Ok(true) => {}
        Ok(false) => {
            return OperationResult::failed(
                package,
                Domain::Package,
                "manager-unavailable",
                format!("{manager_name} is not available"),
            )
            .with_suggestion(manager.install_hint())
        }
        Err(e) => {
            return OperationResult::failed(package, Domain::Package, e.kind(), e.to_string())
        }
    }

    if let Err(e) = manager.install(&ctx, package).await {
        let mut result =
            OperationResult::failed(package, Domain::Package, e.kind(), e.to_string())
                .with_manager(manager_name);
        result.suggestion = e.suggestion();
        return result;
    }

    let identity = manager.lock_identity(package);
    let version = manager.installed_version(&ctx, &identity.name).await.ok();
    let mut metadata = identity.metadata;
    if identity.name != package {
        metadata
            .entry("source_path".to_string())
            .or_insert_with(|| package.to_string());
    }
    match app
        .lock
        .add_package(manager.name(), &identity.name, version.as_deref(), metadata)
    {
        Ok(()) => OperationResult::ok(&identity.name, Domain::Package, ItemStatus::Installed)
            .with_manager(manager_name),
        Err(e) => {
            let mut result = OperationResult::ok(
                &identity.name,
                Domain::Package,
                ItemStatus::InstalledLockFailed,
            )
            .with_manager(manager_name);
            result.error = Some(e.to_string());
            result
        }
    }
}
