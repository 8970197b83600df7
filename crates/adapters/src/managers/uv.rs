// SPDX-License-Identifier: MIT

//! uv adapter (`uv tool` installs)

use super::{
    binary_on_path, run_mutating, InstalledPackage, PackageError, PackageManager,
};
use crate::runner::CommandRunner;
use async_trait::async_trait;
use rig_core::OpCtx;
use std::sync::Arc;

const INSTALL_IDEMPOTENT: &[&str] = &["is already installed"];
const UNINSTALL_IDEMPOTENT: &[&str] = &["is not installed", "not found"];
const UPGRADE_IDEMPOTENT: &[&str] = &["nothing to upgrade", "already up-to-date"];

/// Adapter for Python tools managed with `uv tool`.
pub struct UvManager {
    runner: Arc<dyn CommandRunner>,
}

impl UvManager {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// `uv tool list` prints `name vX.Y.Z` headers with `- entrypoint`
    /// lines between them.
    fn parse_tool_list(text: &str) -> Vec<InstalledPackage> {
        text.lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('-'))
            .filter_map(|line| {
                let mut parts = line.split_whitespace();
                let name = parts.next()?;
                let version = parts
                    .next()
                    .map(|v| v.trim_start_matches('v').to_string());
                Some(InstalledPackage {
                    name: name.to_string(),
                    version,
                })
            })
            .collect()
    }
}

#[async_trait]
impl PackageManager for UvManager {
    fn name(&self) -> &str {
        "uv"
    }

    fn install_hint(&self) -> String {
        "install uv from https://docs.astral.sh/uv".to_string()
    }

    fn supports_search(&self) -> bool {
        false
    }

    async fn is_available(&self, _ctx: &OpCtx) -> Result<bool, PackageError> {
        Ok(binary_on_path(&self.runner, "uv"))
    }

    async fn list_installed(&self, ctx: &OpCtx) -> Result<Vec<InstalledPackage>, PackageError> {
        let out = self.runner.run(ctx, "uv", &["tool", "list"]).await?;
        // An empty tool set is reported on stderr with exit 0 or 1
        // depending on the uv version.
        let combined = out.combined();
        if combined.contains("No tools installed") {
            return Ok(Vec::new());
        }
        if !out.success() {
            return Err(PackageError::parse("uv", combined));
        }
        Ok(Self::parse_tool_list(&out.stdout_str()))
    }

    async fn install(&self, ctx: &OpCtx, name: &str) -> Result<(), PackageError> {
        run_mutating(
            &self.runner,
            ctx,
            "uv",
            &["tool", "install", name],
            name,
            INSTALL_IDEMPOTENT,
        )
        .await
    }

    async fn uninstall(&self, ctx: &OpCtx, name: &str) -> Result<(), PackageError> {
        run_mutating(
            &self.runner,
            ctx,
            "uv",
            &["tool", "uninstall", name],
            name,
            UNINSTALL_IDEMPOTENT,
        )
        .await
    }

    async fn upgrade(&self, ctx: &OpCtx, names: &[String]) -> Result<(), PackageError> {
        let mut args = vec!["tool", "upgrade"];
        if names.is_empty() {
            args.push("--all");
        } else {
            args.extend(names.iter().map(String::as_str));
        }
        let target = if names.is_empty() { "all" } else { &names[0] };
        run_mutating(&self.runner, ctx, "uv", &args, target, UPGRADE_IDEMPOTENT).await
    }
}

#[cfg(test)]
#[path = "uv_tests.rs"]
mod tests;
