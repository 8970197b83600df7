// SPDX-License-Identifier: MIT

//! Cargo adapter (`cargo install` binaries)

use super::{
    binary_on_path, run_mutating, InstalledPackage, PackageError, PackageInfo, PackageManager,
};
use crate::runner::CommandRunner;
use async_trait::async_trait;
use rig_core::OpCtx;
use std::sync::Arc;

const INSTALL_IDEMPOTENT: &[&str] = &["already installed", "is already installed"];
const UNINSTALL_IDEMPOTENT: &[&str] = &["did not match any packages", "is not installed"];
const UPGRADE_IDEMPOTENT: &[&str] = &["already installed", "ignored"];

/// Adapter for crates installed with `cargo install`.
pub struct CargoManager {
    runner: Arc<dyn CommandRunner>,
}

impl CargoManager {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// Parse `cargo install --list`: headers are `name vX.Y.Z:` (optionally
    /// with a source suffix), each followed by indented binary names.
    fn parse_install_list(text: &str) -> Vec<InstalledPackage> {
        text.lines()
            .filter(|line| !line.starts_with(char::is_whitespace))
            .filter_map(|header| {
                let header = header.trim_end_matches(':');
                let mut parts = header.split_whitespace();
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
impl PackageManager for CargoManager {
    fn name(&self) -> &str {
        "cargo"
    }

    fn install_hint(&self) -> String {
        "install rust via https://rustup.rs".to_string()
    }

    async fn is_available(&self, _ctx: &OpCtx) -> Result<bool, PackageError> {
        Ok(binary_on_path(&self.runner, "cargo"))
    }

    async fn list_installed(&self, ctx: &OpCtx) -> Result<Vec<InstalledPackage>, PackageError> {
        let stdout = self
            .runner
            .execute(ctx, "cargo", &["install", "--list"])
            .await?;
        Ok(Self::parse_install_list(&String::from_utf8_lossy(&stdout)))
    }

    async fn install(&self, ctx: &OpCtx, name: &str) -> Result<(), PackageError> {
        run_mutating(
            &self.runner,
            ctx,
            "cargo",
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
            "cargo",
            &["uninstall", name],
            name,
            UNINSTALL_IDEMPOTENT,
        )
        .await
    }

    async fn search(&self, ctx: &OpCtx, query: &str) -> Result<Vec<String>, PackageError> {
        let stdout = self
            .runner
            .execute(ctx, "cargo", &["search", query, "--limit", "20"])
            .await?;
        // Lines look like `name = "0.1.0"    # description`.
        Ok(String::from_utf8_lossy(&stdout)
            .lines()
            .filter_map(|line| line.split(" = ").next())
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with("..."))
            .map(str::to_string)
            .collect())
    }

    async fn info(&self, ctx: &OpCtx, name: &str) -> Result<PackageInfo, PackageError> {
        let installed = self.list_installed(ctx).await?;
        let local = installed.iter().find(|p| p.name == name);

        // `cargo search` gives the registry view without needing nightly.
        let out = self
            .runner
            .run(ctx, "cargo", &["search", name, "--limit", "1"])
            .await?;
        let stdout = out.stdout_str();
        let registry_line = stdout.lines().find(|l| {
            l.split(" = ").next().map(str::trim) == Some(name)
        });
        let description = registry_line
            .and_then(|l| l.split('#').nth(1))
            .map(|d| d.trim().to_string());
        let registry_version = registry_line
            .and_then(|l| l.split('"').nth(1))
            .map(str::to_string);

        if local.is_none() && registry_line.is_none() {
            return Err(PackageError::NotFound {
                name: name.to_string(),
            });
        }
        Ok(PackageInfo {
            name: name.to_string(),
            version: local
                .and_then(|p| p.version.clone())
                .or(registry_version),
            description,
            homepage: None,
            dependencies: Vec::new(),
            installed: local.is_some(),
            manager: "cargo".to_string(),
        })
    }

    async fn upgrade(&self, ctx: &OpCtx, names: &[String]) -> Result<(), PackageError> {
        if names.is_empty() {
            return Err(PackageError::unsupported("cargo", "upgrade-all"));
        }
        for name in names {
            // Re-running install picks up the newest release; an
            // up-to-date crate is reported as already installed.
            run_mutating(
                &self.runner,
                ctx,
                "cargo",
                &["install", name],
                name,
                UPGRADE_IDEMPOTENT,
            )
            .await?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "cargo_tests.rs"]
mod tests;
