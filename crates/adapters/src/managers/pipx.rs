// SPDX-License-Identifier: MIT

//! pipx adapter

use super::{
    binary_on_path, parse, run_mutating, InstalledPackage, PackageError, PackageManager,
};
use crate::runner::CommandRunner;
use async_trait::async_trait;
use rig_core::OpCtx;
use std::sync::Arc;

const INSTALL_IDEMPOTENT: &[&str] = &["already installed"];
const UNINSTALL_IDEMPOTENT: &[&str] = &["nothing to uninstall", "is not installed"];
const UPGRADE_IDEMPOTENT: &[&str] = &["already at latest version", "is already at latest version"];

/// Adapter for Python applications managed with pipx.
pub struct PipxManager {
    runner: Arc<dyn CommandRunner>,
}

impl PipxManager {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }
}

#[async_trait]
impl PackageManager for PipxManager {
    fn name(&self) -> &str {
        "pipx"
    }

    fn install_hint(&self) -> String {
        "install pipx, e.g. brew install pipx".to_string()
    }

    fn supports_search(&self) -> bool {
        false
    }

    async fn is_available(&self, _ctx: &OpCtx) -> Result<bool, PackageError> {
        Ok(binary_on_path(&self.runner, "pipx"))
    }

    async fn list_installed(&self, ctx: &OpCtx) -> Result<Vec<InstalledPackage>, PackageError> {
        let stdout = self
            .runner
            .execute(ctx, "pipx", &["list", "--json"])
            .await?;
        let text = String::from_utf8_lossy(&stdout);
        let value: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| PackageError::parse("pipx", e.to_string()))?;
        let Some(venvs) = value.get("venvs") else {
            return Ok(Vec::new());
        };
        parse::json_map(
            "pipx",
            &venvs.to_string(),
            Some("metadata.main_package.package_version"),
        )
    }

    async fn install(&self, ctx: &OpCtx, name: &str) -> Result<(), PackageError> {
        run_mutating(
            &self.runner,
            ctx,
            "pipx",
            &["install", name],
            name,
            INSTALL_IDEMPOTENT,
        )
        .await
    }

    async fn uninstall(&self, ctx: &OpCtx, name: &str) -> Result<(), PackageError> {
        run_mutating(
            &self.runner,
            ctx,
            "pipx",
            &["uninstall", name],
            name,
            UNINSTALL_IDEMPOTENT,
        )
        .await
    }

    async fn upgrade(&self, ctx: &OpCtx, names: &[String]) -> Result<(), PackageError> {
        if names.is_empty() {
            return run_mutating(
                &self.runner,
                ctx,
                "pipx",
                &["upgrade-all"],
                "all",
                UPGRADE_IDEMPOTENT,
            )
            .await;
        }
        for name in names {
            run_mutating(
                &self.runner,
                ctx,
                "pipx",
                &["upgrade", name],
                name,
                UPGRADE_IDEMPOTENT,
            )
            .await?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "pipx_tests.rs"]
mod tests;
