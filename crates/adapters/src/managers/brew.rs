// SPDX-License-Identifier: MIT

//! Homebrew adapter

use super::{
    binary_on_path, run_mutating, InstalledPackage, PackageError, PackageInfo, PackageManager,
};
use crate::runner::CommandRunner;
use async_trait::async_trait;
use rig_core::OpCtx;
use std::collections::HashMap;
use std::sync::Arc;

const INSTALL_IDEMPOTENT: &[&str] = &["already installed", "already up-to-date"];
const UNINSTALL_IDEMPOTENT: &[&str] = &["no such keg", "is not installed"];
const UPGRADE_IDEMPOTENT: &[&str] = &["already up-to-date", "already installed"];

/// Adapter for Homebrew formulae.
pub struct BrewManager {
    runner: Arc<dyn CommandRunner>,
}

impl BrewManager {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// Names, aliases, and versions of installed formulae from the JSON
    /// info dump. Aliases count as installed so a lock entry recorded under
    /// an alias still reconciles as present.
    async fn installed_details(
        &self,
        ctx: &OpCtx,
    ) -> Result<HashMap<String, Option<String>>, PackageError> {
        let out = self
            .runner
            .run(ctx, "brew", &["info", "--json=v2", "--installed"])
            .await?;
        if !out.success() {
            return Err(PackageError::parse("brew", "info --installed failed"));
        }
        let value: serde_json::Value = serde_json::from_str(&out.stdout_str())
            .map_err(|e| PackageError::parse("brew", e.to_string()))?;
        let mut details = HashMap::new();
        let formulae = value
            .get("formulae")
            .and_then(|f| f.as_array())
            .ok_or_else(|| PackageError::parse("brew", "missing formulae array"))?;
        for formula in formulae {
            let Some(name) = formula.get("name").and_then(|n| n.as_str()) else {
                continue;
            };
            let version = formula
                .get("installed")
                .and_then(|i| i.as_array())
                .and_then(|i| i.first())
                .and_then(|i| i.get("version"))
                .and_then(|v| v.as_str())
                .map(str::to_string);
            details.insert(name.to_string(), version.clone());
            if let Some(aliases) = formula.get("aliases").and_then(|a| a.as_array()) {
                for alias in aliases.iter().filter_map(|a| a.as_str()) {
                    details.insert(alias.to_string(), version.clone());
                }
            }
        }
        Ok(details)
    }
}

#[async_trait]
impl PackageManager for BrewManager {
    fn name(&self) -> &str {
        "brew"
    }

    fn install_hint(&self) -> String {
        "install Homebrew from https://brew.sh".to_string()
    }

    async fn is_available(&self, _ctx: &OpCtx) -> Result<bool, PackageError> {
        Ok(binary_on_path(&self.runner, "brew"))
    }

    async fn list_installed(&self, ctx: &OpCtx) -> Result<Vec<InstalledPackage>, PackageError> {
        let stdout = self.runner.execute(ctx, "brew", &["list", "-1"]).await?;
        let names = String::from_utf8_lossy(&stdout);
        let mut packages: Vec<InstalledPackage> = names
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(InstalledPackage::new)
            .collect();

        // Alias and version enrichment is best-effort; the plain listing
        // stands on its own if the JSON dump is unusable.
        match self.installed_details(ctx).await {
            Ok(details) => {
                for p in &mut packages {
                    if let Some(version) = details.get(&p.name) {
                        p.version = version.clone();
                    }
                }
                let listed: std::collections::HashSet<&str> =
                    packages.iter().map(|p| p.name.as_str()).collect();
                let mut aliases: Vec<InstalledPackage> = details
                    .iter()
                    .filter(|(name, _)| !listed.contains(name.as_str()))
                    .map(|(name, version)| InstalledPackage {
                        name: name.clone(),
                        version: version.clone(),
                    })
                    .collect();
                aliases.sort_by(|a, b| a.name.cmp(&b.name));
                packages.extend(aliases);
            }
            Err(e) => {
                tracing::debug!(error = %e, "brew alias enrichment failed");
            }
        }
        Ok(packages)
    }

    async fn install(&self, ctx: &OpCtx, name: &str) -> Result<(), PackageError> {
        run_mutating(
            &self.runner,
            ctx,
            "brew",
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
            "brew",
            &["uninstall", name],
            name,
            UNINSTALL_IDEMPOTENT,
        )
        .await
    }

    async fn installed_version(&self, ctx: &OpCtx, name: &str) -> Result<String, PackageError> {
        // `list --versions` prints "name version [version...]".
        let out = self
            .runner
            .run(ctx, "brew", &["list", "--versions", name])
            .await?;
        if out.success() {
            let stdout = out.stdout_str();
            if let Some(version) = stdout.split_whitespace().nth(1) {
                return Ok(version.to_string());
            }
        }
        Err(PackageError::NotInstalled {
            name: name.to_string(),
        })
    }

    async fn search(&self, ctx: &OpCtx, query: &str) -> Result<Vec<String>, PackageError> {
        let stdout = self.runner.execute(ctx, "brew", &["search", query]).await?;
        Ok(String::from_utf8_lossy(&stdout)
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with("==>"))
            .map(str::to_string)
            .collect())
    }

    async fn info(&self, ctx: &OpCtx, name: &str) -> Result<PackageInfo, PackageError> {
        let stdout = self
            .runner
            .execute(ctx, "brew", &["info", "--json=v2", name])
            .await?;
        let value: serde_json::Value = serde_json::from_str(&String::from_utf8_lossy(&stdout))
            .map_err(|e| PackageError::parse("brew", e.to_string()))?;
        let formula = value
            .get("formulae")
            .and_then(|f| f.as_array())
            .and_then(|f| f.first())
            .ok_or_else(|| PackageError::NotFound {
                name: name.to_string(),
            })?;

        let installed = formula
            .get("installed")
            .and_then(|i| i.as_array())
            .is_some_and(|i| !i.is_empty());
        Ok(PackageInfo {
            name: formula
                .get("name")
                .and_then(|n| n.as_str())
                .unwrap_or(name)
                .to_string(),
            version: formula
                .get("versions")
                .and_then(|v| v.get("stable"))
                .and_then(|v| v.as_str())
                .map(str::to_string),
            description: formula
                .get("desc")
                .and_then(|d| d.as_str())
                .map(str::to_string),
            homepage: formula
                .get("homepage")
                .and_then(|h| h.as_str())
                .map(str::to_string),
            dependencies: formula
                .get("dependencies")
                .and_then(|d| d.as_array())
                .map(|d| {
                    d.iter()
                        .filter_map(|x| x.as_str())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            installed,
            manager: "brew".to_string(),
        })
    }

    async fn upgrade(&self, ctx: &OpCtx, names: &[String]) -> Result<(), PackageError> {
        let mut args = vec!["upgrade"];
        args.extend(names.iter().map(String::as_str));
        let target = if names.is_empty() { "all" } else { &names[0] };
        run_mutating(&self.runner, ctx, "brew", &args, target, UPGRADE_IDEMPOTENT).await
    }
}

#[cfg(test)]
#[path = "brew_tests.rs"]
mod tests;
