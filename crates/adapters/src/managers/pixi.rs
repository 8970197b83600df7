// SPDX-License-Identifier: MIT

//! pixi adapter (global environments)

use super::{
    binary_on_path, run_mutating, InstalledPackage, PackageError, PackageManager,
};
use crate::runner::CommandRunner;
use async_trait::async_trait;
use rig_core::OpCtx;
use std::sync::Arc;

const INSTALL_IDEMPOTENT: &[&str] = &["already installed", "already exists"];
const UNINSTALL_IDEMPOTENT: &[&str] = &["not found in global environment", "is not installed"];
const UPGRADE_IDEMPOTENT: &[&str] = &["nothing to update", "already up-to-date"];

/// Adapter for packages in pixi global environments.
pub struct PixiManager {
    runner: Arc<dyn CommandRunner>,
}

impl PixiManager {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// `pixi global list` renders a tree; strip the drawing glyphs and
    /// parse `name: version` entries.
    fn parse_global_list(text: &str) -> Vec<InstalledPackage> {
        text.lines()
            .map(|line| {
                line.trim_start_matches(|c: char| {
                    matches!(c, '└' | '├' | '│' | '─' | ' ' | '\t')
                })
            })
            .filter(|l| !l.is_empty() && !l.ends_with(':'))
            .filter_map(|line| {
                let (name, rest) = line.split_once(':').or_else(|| line.split_once(' '))?;
                let version = rest.split_whitespace().next().map(str::to_string);
                Some(InstalledPackage {
                    name: name.trim().to_string(),
                    version,
                })
            })
            .collect()
    }
}

#[async_trait]
impl PackageManager for PixiManager {
    fn name(&self) -> &str {
        "pixi"
    }

    fn install_hint(&self) -> String {
        "install pixi from https://pixi.sh".to_string()
    }

    async fn is_available(&self, _ctx: &OpCtx) -> Result<bool, PackageError> {
        Ok(binary_on_path(&self.runner, "pixi"))
    }

    async fn list_installed(&self, ctx: &OpCtx) -> Result<Vec<InstalledPackage>, PackageError> {
        let out = self.runner.run(ctx, "pixi", &["global", "list"]).await?;
        let combined = out.combined();
        if combined.contains("No global environments") {
            return Ok(Vec::new());
        }
        if !out.success() {
            return Err(PackageError::parse("pixi", combined));
        }
        Ok(Self::parse_global_list(&out.stdout_str()))
    }

    async fn install(&self, ctx: &OpCtx, name: &str) -> Result<(), PackageError> {
        run_mutating(
            &self.runner,
            ctx,
            "pixi",
            &["global", "install", name],
            name,
            INSTALL_IDEMPOTENT,
        )
        .await
    }

    async fn uninstall(&self, ctx: &OpCtx, name: &str) -> Result<(), PackageError> {
        run_mutating(
            &self.runner,
            ctx,
            "pixi",
            &["global", "uninstall", name],
            name,
            UNINSTALL_IDEMPOTENT,
        )
        .await
    }

    async fn search(&self, ctx: &OpCtx, query: &str) -> Result<Vec<String>, PackageError> {
        let stdout = self
            .runner
            .execute(ctx, "pixi", &["search", query])
            .await?;
        Ok(String::from_utf8_lossy(&stdout)
            .lines()
            .filter_map(|l| l.split_whitespace().next())
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }

    async fn upgrade(&self, ctx: &OpCtx, names: &[String]) -> Result<(), PackageError> {
        let mut args = vec!["global", "update"];
        args.extend(names.iter().map(String::as_str));
        let target = if names.is_empty() { "all" } else { &names[0] };
        run_mutating(&self.runner, ctx, "pixi", &args, target, UPGRADE_IDEMPOTENT).await
    }
}

#[cfg(test)]
#[path = "pixi_tests.rs"]
mod tests;
