// SPDX-License-Identifier: MIT

//! APT adapter (Debian-family Linux only)

use super::{
    binary_on_path, matches_any, classify_failure, InstalledPackage, PackageError, PackageInfo,
    PackageManager,
};
use crate::runner::CommandRunner;
use async_trait::async_trait;
use rig_core::OpCtx;
use std::sync::Arc;

const INSTALL_IDEMPOTENT: &[&str] = &["is already the newest version"];
const UNINSTALL_IDEMPOTENT: &[&str] = &["is not installed", "unable to locate package"];

/// Adapter for apt/dpkg systems. Unavailable (not an error) on every other
/// OS.
pub struct AptManager {
    runner: Arc<dyn CommandRunner>,
}

impl AptManager {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    async fn run_apt(
        &self,
        ctx: &OpCtx,
        args: &[&str],
        package: &str,
        idempotent: &[&str],
    ) -> Result<(), PackageError> {
        let out = self.runner.run(ctx, "apt-get", args).await?;
        if out.success() || matches_any(&out.combined(), idempotent) {
            return Ok(());
        }
        let combined = out.combined();
        if matches_any(&combined, &["are you root", "permission denied"]) {
            return Err(PackageError::PermissionDenied {
                message: format!("apt-get requires elevation to modify {package}"),
            });
        }
        Err(classify_failure(package, &out))
    }
}

#[async_trait]
impl PackageManager for AptManager {
    fn name(&self) -> &str {
        "apt"
    }

    fn install_hint(&self) -> String {
        "apt is only available on Debian-family Linux systems".to_string()
    }

    async fn is_available(&self, _ctx: &OpCtx) -> Result<bool, PackageError> {
        if !cfg!(target_os = "linux") {
            return Ok(false);
        }
        Ok(binary_on_path(&self.runner, "dpkg") && binary_on_path(&self.runner, "apt-get"))
    }

    async fn list_installed(&self, ctx: &OpCtx) -> Result<Vec<InstalledPackage>, PackageError> {
        let stdout = self
            .runner
            .execute(
                ctx,
                "dpkg-query",
                &["--show", "--showformat", "${Package}\t${Version}\n"],
            )
            .await?;
        Ok(String::from_utf8_lossy(&stdout)
            .lines()
            .filter_map(|line| {
                let (name, version) = line.split_once('\t')?;
                Some(InstalledPackage {
                    name: name.to_string(),
                    version: (!version.is_empty()).then(|| version.to_string()),
                })
            })
            .collect())
    }

    async fn install(&self, ctx: &OpCtx, name: &str) -> Result<(), PackageError> {
        self.run_apt(ctx, &["install", "-y", name], name, INSTALL_IDEMPOTENT)
            .await
    }

    async fn uninstall(&self, ctx: &OpCtx, name: &str) -> Result<(), PackageError> {
        self.run_apt(ctx, &["remove", "-y", name], name, UNINSTALL_IDEMPOTENT)
            .await
    }

    async fn search(&self, ctx: &OpCtx, query: &str) -> Result<Vec<String>, PackageError> {
        let stdout = self
            .runner
            .execute(ctx, "apt-cache", &["search", query])
            .await?;
        // Lines look like `name - short description`.
        Ok(String::from_utf8_lossy(&stdout)
            .lines()
            .filter_map(|line| line.split_whitespace().next())
            .map(str::to_string)
            .collect())
    }

    async fn info(&self, ctx: &OpCtx, name: &str) -> Result<PackageInfo, PackageError> {
        let stdout = self
            .runner
            .execute(ctx, "apt-cache", &["show", name])
            .await?;
        let text = String::from_utf8_lossy(&stdout).into_owned();
        if text.trim().is_empty() {
            return Err(PackageError::NotFound {
                name: name.to_string(),
            });
        }
        let field = |key: &str| -> Option<String> {
            text.lines()
                .find_map(|l| l.strip_prefix(key))
                .map(|v| v.trim().to_string())
        };
        let installed = self.is_installed(ctx, name).await.unwrap_or(false);
        Ok(PackageInfo {
            name: name.to_string(),
            version: field("Version:"),
            description: field("Description:").or_else(|| field("Description-en:")),
            homepage: field("Homepage:"),
            dependencies: field("Depends:")
                .map(|deps| {
                    deps.split(',')
                        .filter_map(|d| d.split_whitespace().next())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            installed,
            manager: "apt".to_string(),
        })
    }

    async fn upgrade(&self, ctx: &OpCtx, names: &[String]) -> Result<(), PackageError> {
        if names.is_empty() {
            return self
                .run_apt(ctx, &["upgrade", "-y"], "all", INSTALL_IDEMPOTENT)
                .await;
        }
        for name in names {
            self.run_apt(
                ctx,
                &["install", "--only-upgrade", "-y", name],
                name,
                INSTALL_IDEMPOTENT,
            )
            .await?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "apt_tests.rs"]
mod tests;
