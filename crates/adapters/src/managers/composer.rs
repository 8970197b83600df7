// SPDX-License-Identifier: MIT

//! Composer adapter (global mode)

use super::{
    binary_on_path, parse, run_mutating, InstalledPackage, PackageError, PackageInfo,
    PackageManager,
};
use crate::runner::CommandRunner;
use async_trait::async_trait;
use rig_core::OpCtx;
use std::sync::Arc;

const INSTALL_IDEMPOTENT: &[&str] = &["already present", "nothing to install, update or remove"];
const UNINSTALL_IDEMPOTENT: &[&str] = &["is not required", "not installed"];
const UPGRADE_IDEMPOTENT: &[&str] = &["nothing to install, update or remove"];

/// Adapter for Composer packages installed with `composer global`.
pub struct ComposerManager {
    runner: Arc<dyn CommandRunner>,
}

impl ComposerManager {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// `composer global show --format=json` yields
    /// `{"installed": [{"name", "version", "description"}]}`. Falls back to
    /// line parsing when the JSON is unusable.
    fn parse_show(text: &str) -> Result<Vec<InstalledPackage>, PackageError> {
        match serde_json::from_str::<serde_json::Value>(text) {
            Ok(value) => Ok(value
                .get("installed")
                .and_then(|i| i.as_array())
                .map(|installed| {
                    installed
                        .iter()
                        .filter_map(|entry| {
                            let name = entry.get("name")?.as_str()?;
                            Some(InstalledPackage {
                                name: name.to_string(),
                                version: entry
                                    .get("version")
                                    .and_then(|v| v.as_str())
                                    .map(str::to_string),
                            })
                        })
                        .collect()
                })
                .unwrap_or_default()),
            Err(_) => Ok(parse::lines(text)),
        }
    }
}

#[async_trait]
impl PackageManager for ComposerManager {
    fn name(&self) -> &str {
        "composer"
    }

    fn install_hint(&self) -> String {
        "install composer from https://getcomposer.org".to_string()
    }

    async fn is_available(&self, _ctx: &OpCtx) -> Result<bool, PackageError> {
        Ok(binary_on_path(&self.runner, "composer"))
    }

    async fn list_installed(&self, ctx: &OpCtx) -> Result<Vec<InstalledPackage>, PackageError> {
        let out = self
            .runner
            .run(ctx, "composer", &["global", "show", "--format=json"])
            .await?;
        // An empty global project exits non-zero with no packages.
        if !out.success() && out.stdout.is_empty() {
            return Ok(Vec::new());
        }
        Self::parse_show(&out.stdout_str())
    }

    async fn install(&self, ctx: &OpCtx, name: &str) -> Result<(), PackageError> {
        run_mutating(
            &self.runner,
            ctx,
            "composer",
            &["global", "require", name],
            name,
            INSTALL_IDEMPOTENT,
        )
        .await
    }

    async fn uninstall(&self, ctx: &OpCtx, name: &str) -> Result<(), PackageError> {
        run_mutating(
            &self.runner,
            ctx,
            "composer",
            &["global", "remove", name],
            name,
            UNINSTALL_IDEMPOTENT,
        )
        .await
    }

    async fn search(&self, ctx: &OpCtx, query: &str) -> Result<Vec<String>, PackageError> {
        let out = self
            .runner
            .run(ctx, "composer", &["search", query, "--format=json"])
            .await?;
        if !out.success() {
            return Err(PackageError::parse("composer", "search failed"));
        }
        let stdout = out.stdout_str();
        match serde_json::from_str::<serde_json::Value>(&stdout) {
            Ok(value) => Ok(value
                .as_array()
                .map(|results| {
                    results
                        .iter()
                        .filter_map(|r| r.get("name").and_then(|n| n.as_str()))
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default()),
            // Older composer prints `vendor/name description` lines.
            Err(_) => Ok(stdout
                .lines()
                .filter_map(|l| l.split_whitespace().next())
                .map(str::to_string)
                .collect()),
        }
    }

    async fn info(&self, ctx: &OpCtx, name: &str) -> Result<PackageInfo, PackageError> {
        let out = self
            .runner
            .run(ctx, "composer", &["global", "show", name, "--format=json"])
            .await?;
        if !out.success() {
            return Err(PackageError::NotFound {
                name: name.to_string(),
            });
        }
        let value: serde_json::Value = serde_json::from_str(&out.stdout_str())
            .map_err(|e| PackageError::parse("composer", e.to_string()))?;
        Ok(PackageInfo {
            name: name.to_string(),
            version: value
                .get("versions")
                .and_then(|v| v.as_array())
                .and_then(|v| v.first())
                .and_then(|v| v.as_str())
                .map(str::to_string),
            description: value
                .get("description")
                .and_then(|d| d.as_str())
                .map(str::to_string),
            homepage: value
                .get("homepage")
                .and_then(|h| h.as_str())
                .map(str::to_string),
            dependencies: Vec::new(),
            installed: true,
            manager: "composer".to_string(),
        })
    }

    async fn upgrade(&self, ctx: &OpCtx, names: &[String]) -> Result<(), PackageError> {
        let mut args = vec!["global", "update"];
        args.extend(names.iter().map(String::as_str));
        let target = if names.is_empty() { "all" } else { &names[0] };
        run_mutating(
            &self.runner,
            ctx,
            "composer",
            &args,
            target,
            UPGRADE_IDEMPOTENT,
        )
        .await
    }
}

#[cfg(test)]
#[path = "composer_tests.rs"]
mod tests;
