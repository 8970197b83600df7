// SPDX-License-Identifier: MIT

//! RubyGems adapter

use super::{
    binary_on_path, run_mutating, InstalledPackage, PackageError, PackageInfo, PackageManager,
};
use crate::runner::CommandRunner;
use async_trait::async_trait;
use rig_core::OpCtx;
use std::sync::Arc;

const INSTALL_IDEMPOTENT: &[&str] = &["already installed"];
const UNINSTALL_IDEMPOTENT: &[&str] = &["is not installed", "unknown gem"];
const UPGRADE_IDEMPOTENT: &[&str] = &["nothing to update", "already up-to-date"];

/// Adapter for user-installed gems. Installs always pass `--user-install`
/// so no system Ruby is ever touched.
pub struct GemManager {
    runner: Arc<dyn CommandRunner>,
}

impl GemManager {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// Parse `gem list --local`: lines are `name (version[, version...])`.
    fn parse_list(text: &str) -> Vec<InstalledPackage> {
        text.lines()
            .filter_map(|line| {
                let line = line.trim();
                if line.is_empty() || line.starts_with("***") {
                    return None;
                }
                let (name, rest) = line.split_once(' ').unwrap_or((line, ""));
                let version = rest
                    .trim()
                    .strip_prefix('(')
                    .and_then(|v| v.strip_suffix(')'))
                    .and_then(|v| v.split(',').next())
                    .map(|v| v.trim().to_string());
                Some(InstalledPackage {
                    name: name.to_string(),
                    version,
                })
            })
            .collect()
    }
}

#[async_trait]
impl PackageManager for GemManager {
    fn name(&self) -> &str {
        "gem"
    }

    fn install_hint(&self) -> String {
        "install ruby (which bundles gem), e.g. brew install ruby".to_string()
    }

    fn dependencies(&self) -> Vec<String> {
        vec!["brew".to_string()]
    }

    async fn is_available(&self, _ctx: &OpCtx) -> Result<bool, PackageError> {
        Ok(binary_on_path(&self.runner, "gem"))
    }

    async fn list_installed(&self, ctx: &OpCtx) -> Result<Vec<InstalledPackage>, PackageError> {
        let stdout = self.runner.execute(ctx, "gem", &["list", "--local"]).await?;
        Ok(Self::parse_list(&String::from_utf8_lossy(&stdout)))
    }

    async fn install(&self, ctx: &OpCtx, name: &str) -> Result<(), PackageError> {
        run_mutating(
            &self.runner,
            ctx,
            "gem",
            &["install", name, "--user-install"],
            name,
            INSTALL_IDEMPOTENT,
        )
        .await
    }

    async fn uninstall(&self, ctx: &OpCtx, name: &str) -> Result<(), PackageError> {
        // -x removes executables without prompting, -a removes all versions.
        run_mutating(
            &self.runner,
            ctx,
            "gem",
            &["uninstall", "-x", "-a", name],
            name,
            UNINSTALL_IDEMPOTENT,
        )
        .await
    }

    async fn search(&self, ctx: &OpCtx, query: &str) -> Result<Vec<String>, PackageError> {
        let stdout = self
            .runner
            .execute(ctx, "gem", &["search", "--remote", query])
            .await?;
        Ok(Self::parse_list(&String::from_utf8_lossy(&stdout))
            .into_iter()
            .map(|p| p.name)
            .collect())
    }

    async fn info(&self, ctx: &OpCtx, name: &str) -> Result<PackageInfo, PackageError> {
        let out = self
            .runner
            .run(ctx, "gem", &["list", "--local", "-d", name])
            .await?;
        let text = out.stdout_str();
        let parsed = Self::parse_list(&text);
        let found = parsed.iter().find(|p| p.name == name);
        if found.is_none() {
            return Err(PackageError::NotFound {
                name: name.to_string(),
            });
        }
        // The detail listing indents the description under the header line.
        let description = text
            .lines()
            .skip_while(|l| !l.trim_start().starts_with(name))
            .skip(1)
            .map(str::trim)
            .find(|l| !l.is_empty() && !l.starts_with("Authors") && !l.starts_with("Homepage"))
            .map(str::to_string);
        let homepage = text
            .lines()
            .find_map(|l| l.trim().strip_prefix("Homepage:"))
            .map(|h| h.trim().to_string());
        Ok(PackageInfo {
            name: name.to_string(),
            version: found.and_then(|p| p.version.clone()),
            description,
            homepage,
            dependencies: Vec::new(),
            installed: true,
            manager: "gem".to_string(),
        })
    }

    async fn upgrade(&self, ctx: &OpCtx, names: &[String]) -> Result<(), PackageError> {
        let mut args = vec!["update", "--user-install"];
        args.extend(names.iter().map(String::as_str));
        let target = if names.is_empty() { "all" } else { &names[0] };
        run_mutating(&self.runner, ctx, "gem", &args, target, UPGRADE_IDEMPOTENT).await
    }
}

#[cfg(test)]
#[path = "gem_tests.rs"]
mod tests;
