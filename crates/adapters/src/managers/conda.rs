// SPDX-License-Identifier: MIT

//! Conda adapter, preferring mamba when both binaries exist

use super::{
    binary_on_path, parse, run_mutating, InstalledPackage, PackageError, PackageInfo,
    PackageManager,
};
use crate::runner::CommandRunner;
use async_trait::async_trait;
use rig_core::OpCtx;
use std::sync::Arc;

const INSTALL_IDEMPOTENT: &[&str] = &["all requested packages already installed"];
const UNINSTALL_IDEMPOTENT: &[&str] = &["packagesnotfounderror", "is missing from the environment"];
const UPGRADE_IDEMPOTENT: &[&str] = &["all requested packages already installed", "nothing to do"];

/// Adapter for conda environments. When mamba is installed it is used for
/// every call; the two CLIs are argument-compatible.
pub struct CondaManager {
    runner: Arc<dyn CommandRunner>,
}

impl CondaManager {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    fn binary(&self) -> Option<&'static str> {
        if binary_on_path(&self.runner, "mamba") {
            Some("mamba")
        } else if binary_on_path(&self.runner, "conda") {
            Some("conda")
        } else {
            None
        }
    }

    fn require_binary(&self) -> Result<&'static str, PackageError> {
        self.binary().ok_or_else(|| PackageError::ManagerUnavailable {
            manager: "conda".to_string(),
            hint: self.install_hint(),
        })
    }
}

#[async_trait]
impl PackageManager for CondaManager {
    fn name(&self) -> &str {
        "conda"
    }

    fn install_hint(&self) -> String {
        "install miniconda or miniforge from https://conda-forge.org".to_string()
    }

    async fn is_available(&self, _ctx: &OpCtx) -> Result<bool, PackageError> {
        Ok(self.binary().is_some())
    }

    async fn list_installed(&self, ctx: &OpCtx) -> Result<Vec<InstalledPackage>, PackageError> {
        let binary = self.require_binary()?;
        let stdout = self.runner.execute(ctx, binary, &["list", "--json"]).await?;
        parse::json_array("conda", &String::from_utf8_lossy(&stdout), None)
    }

    async fn install(&self, ctx: &OpCtx, name: &str) -> Result<(), PackageError> {
        let binary = self.require_binary()?;
        run_mutating(
            &self.runner,
            ctx,
            binary,
            &["install", "-y", name],
            name,
            INSTALL_IDEMPOTENT,
        )
        .await
    }

    async fn uninstall(&self, ctx: &OpCtx, name: &str) -> Result<(), PackageError> {
        let binary = self.require_binary()?;
        run_mutating(
            &self.runner,
            ctx,
            binary,
            &["remove", "-y", name],
            name,
            UNINSTALL_IDEMPOTENT,
        )
        .await
    }

    async fn search(&self, ctx: &OpCtx, query: &str) -> Result<Vec<String>, PackageError> {
        let binary = self.require_binary()?;
        let stdout = self
            .runner
            .execute(ctx, binary, &["search", query, "--json"])
            .await?;
        let value: serde_json::Value = serde_json::from_str(&String::from_utf8_lossy(&stdout))
            .map_err(|e| PackageError::parse("conda", e.to_string()))?;
        // The result is a map keyed by package name.
        Ok(value
            .as_object()
            .map(|map| map.keys().cloned().collect())
            .unwrap_or_default())
    }

    async fn info(&self, ctx: &OpCtx, name: &str) -> Result<PackageInfo, PackageError> {
        let installed = self.list_installed(ctx).await?;
        let found = installed.iter().find(|p| p.name == name);
        if found.is_none() {
            return Err(PackageError::NotFound {
                name: name.to_string(),
            });
        }
        Ok(PackageInfo {
            name: name.to_string(),
            version: found.and_then(|p| p.version.clone()),
            installed: true,
            manager: "conda".to_string(),
            ..PackageInfo::default()
        })
    }

    async fn upgrade(&self, ctx: &OpCtx, names: &[String]) -> Result<(), PackageError> {
        let binary = self.require_binary()?;
        let mut args = vec!["update", "-y"];
        if names.is_empty() {
            args.push("--all");
        } else {
            args.extend(names.iter().map(String::as_str));
        }
        let target = if names.is_empty() { "all" } else { &names[0] };
        run_mutating(&self.runner, ctx, binary, &args, target, UPGRADE_IDEMPOTENT).await
    }
}

#[cfg(test)]
#[path = "conda_tests.rs"]
mod tests;
