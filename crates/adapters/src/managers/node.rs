// SPDX-License-Identifier: MIT

//! Node tool adapters (npm, pnpm, bun)
//!
//! One adapter parameterized by provider. Scoped names (`@scope/pkg`) are
//! preserved verbatim everywhere; the lock records `scope` and `full_name`
//! metadata so the entry survives round-trips to other machines.

use super::{
    binary_on_path, run_mutating, InstalledPackage, LockIdentity, PackageError, PackageInfo,
    PackageManager,
};
use crate::runner::CommandRunner;
use async_trait::async_trait;
use rig_core::OpCtx;
use std::sync::Arc;

const INSTALL_IDEMPOTENT: &[&str] = &["already installed", "up to date"];
const UNINSTALL_IDEMPOTENT: &[&str] = &["is not installed", "not installed", "nothing to remove"];
const UPGRADE_IDEMPOTENT: &[&str] = &["up to date", "already up-to-date", "nothing to update"];

/// Which global-installing node tool backs the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeProvider {
    Npm,
    Pnpm,
    Bun,
}

impl NodeProvider {
    pub fn binary(&self) -> &'static str {
        match self {
            NodeProvider::Npm => "npm",
            NodeProvider::Pnpm => "pnpm",
            NodeProvider::Bun => "bun",
        }
    }

    fn list_args(&self) -> Vec<&'static str> {
        match self {
            NodeProvider::Npm => vec!["ls", "-g", "--json", "--depth=0"],
            NodeProvider::Pnpm => vec!["ls", "-g", "--json", "--depth=0"],
            NodeProvider::Bun => vec!["pm", "ls", "-g"],
        }
    }

    fn install_args(&self, name: &str) -> Vec<String> {
        let args: &[&str] = match self {
            NodeProvider::Npm => &["install", "-g"],
            NodeProvider::Pnpm => &["add", "-g"],
            NodeProvider::Bun => &["add", "-g"],
        };
        let mut rendered: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        rendered.push(name.to_string());
        rendered
    }

    fn uninstall_args(&self, name: &str) -> Vec<String> {
        let args: &[&str] = match self {
            NodeProvider::Npm => &["uninstall", "-g"],
            NodeProvider::Pnpm => &["remove", "-g"],
            NodeProvider::Bun => &["remove", "-g"],
        };
        let mut rendered: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        rendered.push(name.to_string());
        rendered
    }

    fn install_hint(&self) -> &'static str {
        match self {
            NodeProvider::Npm => "install node (which bundles npm), e.g. brew install node",
            NodeProvider::Pnpm => "install pnpm, e.g. brew install pnpm",
            NodeProvider::Bun => "install bun, e.g. brew install oven-sh/bun/bun",
        }
    }
}

/// Adapter for globally-installed node packages.
pub struct NodeManager {
    provider: NodeProvider,
    runner: Arc<dyn CommandRunner>,
}

impl NodeManager {
    pub fn new(provider: NodeProvider, runner: Arc<dyn CommandRunner>) -> Self {
        Self { provider, runner }
    }

    pub fn npm(runner: Arc<dyn CommandRunner>) -> Self {
        Self::new(NodeProvider::Npm, runner)
    }

    pub fn pnpm(runner: Arc<dyn CommandRunner>) -> Self {
        Self::new(NodeProvider::Pnpm, runner)
    }

    pub fn bun(runner: Arc<dyn CommandRunner>) -> Self {
        Self::new(NodeProvider::Bun, runner)
    }

    fn parse_json_list(&self, text: &str) -> Result<Vec<InstalledPackage>, PackageError> {
        let value: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| PackageError::parse(self.name(), e.to_string()))?;
        // npm emits {"dependencies": {...}}; pnpm emits an array of projects
        // with the same shape.
        let deps = match &value {
            serde_json::Value::Array(projects) => projects
                .first()
                .and_then(|p| p.get("dependencies"))
                .cloned(),
            _ => value.get("dependencies").cloned(),
        };
        let Some(serde_json::Value::Object(deps)) = deps else {
            return Ok(Vec::new());
        };
        Ok(deps
            .iter()
            .map(|(name, entry)| InstalledPackage {
                name: name.clone(),
                version: entry
                    .get("version")
                    .and_then(|v| v.as_str())
                    .map(str::to_string),
            })
            .collect())
    }

    fn parse_bun_list(text: &str) -> Vec<InstalledPackage> {
        // Lines end with "name@version"; tree glyphs precede the name.
        text.lines()
            .filter_map(|line| {
                let cleaned = line
                    .trim_start_matches(|c: char| !c.is_alphanumeric() && c != '@')
                    .trim();
                if cleaned.is_empty() {
                    return None;
                }
                // Split on the last '@' so scoped names keep theirs.
                let at = cleaned.rfind('@').filter(|i| *i > 0)?;
                let (name, version) = cleaned.split_at(at);
                Some(InstalledPackage {
                    name: name.to_string(),
                    version: Some(version[1..].to_string()),
                })
            })
            .collect()
    }
}

#[async_trait]
impl PackageManager for NodeManager {
    fn name(&self) -> &str {
        self.provider.binary()
    }

    fn install_hint(&self) -> String {
        self.provider.install_hint().to_string()
    }

    fn dependencies(&self) -> Vec<String> {
        vec!["brew".to_string()]
    }

    fn lock_identity(&self, requested: &str) -> LockIdentity {
        let mut identity = LockIdentity::plain(requested);
        if let Some((scope, _rest)) = requested.strip_prefix('@').and_then(|r| {
            r.split_once('/')
                .map(|(scope, rest)| (format!("@{scope}"), rest))
        }) {
            identity.metadata.insert("scope".to_string(), scope);
            identity
                .metadata
                .insert("full_name".to_string(), requested.to_string());
        }
        identity
    }

    async fn is_available(&self, _ctx: &OpCtx) -> Result<bool, PackageError> {
        Ok(binary_on_path(&self.runner, self.provider.binary()))
    }

    async fn list_installed(&self, ctx: &OpCtx) -> Result<Vec<InstalledPackage>, PackageError> {
        let binary = self.provider.binary();
        let out = self
            .runner
            .run(ctx, binary, &self.provider.list_args())
            .await?;
        // npm ls exits non-zero on peer-dep warnings while still printing
        // the full JSON tree; parse whatever arrived.
        let stdout = out.stdout_str();
        if stdout.trim().is_empty() {
            return Ok(Vec::new());
        }
        match self.provider {
            NodeProvider::Bun => Ok(Self::parse_bun_list(&stdout)),
            _ => self.parse_json_list(&stdout),
        }
    }

    async fn install(&self, ctx: &OpCtx, name: &str) -> Result<(), PackageError> {
        let args = self.provider.install_args(name);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        run_mutating(
            &self.runner,
            ctx,
            self.provider.binary(),
            &args,
            name,
            INSTALL_IDEMPOTENT,
        )
        .await
    }

    async fn uninstall(&self, ctx: &OpCtx, name: &str) -> Result<(), PackageError> {
        let args = self.provider.uninstall_args(name);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        run_mutating(
            &self.runner,
            ctx,
            self.provider.binary(),
            &args,
            name,
            UNINSTALL_IDEMPOTENT,
        )
        .await
    }

    async fn search(&self, ctx: &OpCtx, query: &str) -> Result<Vec<String>, PackageError> {
        // All three providers resolve against the npm registry; npm's own
        // search output is the common denominator.
        let stdout = self
            .runner
            .execute(ctx, self.provider.binary(), &["search", query, "--json"])
            .await?;
        let value: serde_json::Value = serde_json::from_str(&String::from_utf8_lossy(&stdout))
            .map_err(|e| PackageError::parse(self.name(), e.to_string()))?;
        Ok(value
            .as_array()
            .map(|results| {
                results
                    .iter()
                    .filter_map(|r| r.get("name").and_then(|n| n.as_str()))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn info(&self, ctx: &OpCtx, name: &str) -> Result<PackageInfo, PackageError> {
        let stdout = self
            .runner
            .execute(ctx, self.provider.binary(), &["view", name, "--json"])
            .await?;
        let value: serde_json::Value = serde_json::from_str(&String::from_utf8_lossy(&stdout))
            .map_err(|e| PackageError::parse(self.name(), e.to_string()))?;
        let installed = self.is_installed(ctx, name).await.unwrap_or(false);
        Ok(PackageInfo {
            name: name.to_string(),
            version: value
                .get("version")
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
            dependencies: value
                .get("dependencies")
                .and_then(|d| d.as_object())
                .map(|d| d.keys().cloned().collect())
                .unwrap_or_default(),
            installed,
            manager: self.name().to_string(),
        })
    }

    async fn upgrade(&self, ctx: &OpCtx, names: &[String]) -> Result<(), PackageError> {
        let mut args: Vec<&str> = match self.provider {
            NodeProvider::Npm => vec!["update", "-g"],
            NodeProvider::Pnpm => vec!["update", "-g"],
            NodeProvider::Bun => vec!["update", "-g"],
        };
        args.extend(names.iter().map(String::as_str));
        let target = if names.is_empty() { "all" } else { &names[0] };
        run_mutating(
            &self.runner,
            ctx,
            self.provider.binary(),
            &args,
            target,
            UPGRADE_IDEMPOTENT,
        )
        .await
    }
}

#[cfg(test)]
#[path = "node_tests.rs"]
mod tests;
