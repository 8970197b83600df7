// SPDX-License-Identifier: MIT

//! Uniform package-manager contract and its adapters
//!
//! One adapter per external tool. Each maps availability, listing,
//! install/uninstall, versions, search, info, and upgrade onto that tool's
//! CLI, and declares the output patterns that make a non-zero exit count as
//! success (the single source of idempotence over non-idempotent CLIs).

mod apt;
mod brew;
mod cargo;
mod composer;
mod conda;
mod gem;
mod generic;
mod golang;
mod node;
mod parse;
mod pipx;
mod pixi;
mod uv;

pub use apt::AptManager;
pub use brew::BrewManager;
pub use cargo::CargoManager;
pub use composer::ComposerManager;
pub use conda::CondaManager;
pub use gem::GemManager;
pub use generic::GenericManager;
pub use golang::GoManager;
pub use node::{NodeManager, NodeProvider};
pub use pipx::PipxManager;
pub use pixi::PixiManager;
pub use uv::UvManager;

use crate::runner::{CmdOutput, CommandRunner, RunnerError};
use async_trait::async_trait;
use rig_core::OpCtx;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors from package-manager operations
#[derive(Debug, Error)]
pub enum PackageError {
    #[error("{manager} is not available. {hint}")]
    ManagerUnavailable { manager: String, hint: String },

    #[error("package not found: {name}")]
    NotFound { name: String },

    #[error("permission denied: {message}")]
    PermissionDenied { message: String },

    #[error("dependency conflict: {message}")]
    DependencyConflict { message: String },

    #[error("network failure: {message}")]
    Network { message: String },

    #[error("build failed: {message}")]
    BuildFailed { message: String },

    #[error("package database is locked: {message}")]
    LockContention { message: String },

    #[error("package not installed: {name}")]
    NotInstalled { name: String },

    #[error("{manager} does not support {operation}")]
    Unsupported {
        manager: String,
        operation: &'static str,
    },

    #[error("failed to parse {manager} output: {message}")]
    Parse { manager: String, message: String },

    #[error("command failed: {message}")]
    CommandFailed { message: String },

    #[error(transparent)]
    Runner(#[from] RunnerError),
}

impl PackageError {
    pub fn unsupported(manager: &str, operation: &'static str) -> Self {
        PackageError::Unsupported {
            manager: manager.to_string(),
            operation,
        }
    }

    pub fn parse(manager: &str, message: impl Into<String>) -> Self {
        PackageError::Parse {
            manager: manager.to_string(),
            message: message.into(),
        }
    }

    /// Stable kind string for reports and summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            PackageError::ManagerUnavailable { .. } => "manager-unavailable",
            PackageError::NotFound { .. } => "package-not-found",
            PackageError::PermissionDenied { .. } => "permission-denied",
            PackageError::DependencyConflict { .. } => "dependency-conflict",
            PackageError::Network { .. } => "network",
            PackageError::BuildFailed { .. } => "build-failed",
            PackageError::LockContention { .. } => "lock-contention",
            PackageError::NotInstalled { .. } => "not-installed",
            PackageError::Unsupported { .. } => "unsupported",
            PackageError::Parse { .. } => "parse",
            PackageError::CommandFailed { .. } => "command-failed",
            PackageError::Runner(RunnerError::Canceled) => "canceled",
            PackageError::Runner(RunnerError::Timeout { .. }) => "timeout",
            PackageError::Runner(RunnerError::NotFound(_)) => "manager-unavailable",
            PackageError::Runner(_) => "command-failed",
        }
    }

    /// A user-facing hint, when one applies.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            PackageError::ManagerUnavailable { hint, .. } => Some(hint.clone()),
            PackageError::PermissionDenied { .. } => {
                Some("try re-running with elevated privileges".to_string())
            }
            PackageError::Network { .. } => {
                Some("check your connection and retry".to_string())
            }
            _ => None,
        }
    }
}

/// One installed package as observed by a manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledPackage {
    pub name: String,
    pub version: Option<String>,
}

impl InstalledPackage {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
        }
    }

    pub fn with_version(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: Some(version.into()),
        }
    }
}

/// Details for one package, installed or not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageInfo {
    pub name: String,
    pub version: Option<String>,
    pub description: Option<String>,
    pub homepage: Option<String>,
    pub dependencies: Vec<String>,
    pub installed: bool,
    pub manager: String,
}

/// How a requested package is recorded in the lock.
///
/// Most managers record the name verbatim; go uses the module basename and
/// preserves the full path, npm records scope metadata for `@scope/pkg`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockIdentity {
    pub name: String,
    pub metadata: BTreeMap<String, String>,
}

impl LockIdentity {
    pub fn plain(name: &str) -> Self {
        Self {
            name: name.to_string(),
            metadata: BTreeMap::new(),
        }
    }
}

/// The uniform contract every adapter implements.
#[async_trait]
pub trait PackageManager: Send + Sync {
    fn name(&self) -> &str;

    /// Shown when the manager's binary is absent.
    fn install_hint(&self) -> String;

    /// Managers that must be present for this one to self-install.
    /// Pure and synchronous.
    fn dependencies(&self) -> Vec<String> {
        Vec::new()
    }

    fn supports_search(&self) -> bool {
        true
    }

    /// Lock id and metadata for a requested package name.
    fn lock_identity(&self, requested: &str) -> LockIdentity {
        LockIdentity::plain(requested)
    }

    /// Whether the manager can be used here. A missing binary is `Ok(false)`,
    /// never an error; only infrastructural failures error.
    async fn is_available(&self, ctx: &OpCtx) -> Result<bool, PackageError>;

    async fn list_installed(&self, ctx: &OpCtx) -> Result<Vec<InstalledPackage>, PackageError>;

    /// Idempotent: succeeding when the package is already installed.
    async fn install(&self, ctx: &OpCtx, name: &str) -> Result<(), PackageError>;

    /// Idempotent: succeeding when the package is already absent.
    async fn uninstall(&self, ctx: &OpCtx, name: &str) -> Result<(), PackageError>;

    async fn is_installed(&self, ctx: &OpCtx, name: &str) -> Result<bool, PackageError> {
        Ok(self
            .list_installed(ctx)
            .await?
            .iter()
            .any(|p| p.name == name))
    }

    async fn installed_version(&self, ctx: &OpCtx, name: &str) -> Result<String, PackageError> {
        let installed = self.list_installed(ctx).await?;
        match installed.iter().find(|p| p.name == name) {
            Some(p) => p.version.clone().ok_or_else(|| {
                PackageError::parse(self.name(), format!("no version recorded for {name}"))
            }),
            None => Err(PackageError::NotInstalled {
                name: name.to_string(),
            }),
        }
    }

    async fn search(&self, _ctx: &OpCtx, _query: &str) -> Result<Vec<String>, PackageError> {
        Err(PackageError::unsupported(self.name(), "search"))
    }

    async fn info(&self, ctx: &OpCtx, name: &str) -> Result<PackageInfo, PackageError> {
        let installed = self.list_installed(ctx).await?;
        let found = installed.iter().find(|p| p.name == name);
        Ok(PackageInfo {
            name: name.to_string(),
            version: found.and_then(|p| p.version.clone()),
            installed: found.is_some(),
            manager: self.name().to_string(),
            ..PackageInfo::default()
        })
    }

    /// Upgrade the named packages; empty means upgrade-all where supported.
    /// Idempotent on "already latest".
    async fn upgrade(&self, ctx: &OpCtx, names: &[String]) -> Result<(), PackageError>;
}

// ── Shared helpers ──────────────────────────────────────────────────────────

/// Case-insensitive substring match against any of `patterns`.
pub(crate) fn matches_any(haystack: &str, patterns: &[&str]) -> bool {
    let lower = haystack.to_lowercase();
    patterns.iter().any(|p| lower.contains(&p.to_lowercase()))
}

/// Resolve availability by probing the binary on PATH.
pub(crate) fn binary_on_path(runner: &Arc<dyn CommandRunner>, binary: &str) -> bool {
    runner.look_path(binary).is_some()
}

/// Map a failed mutating command to a structured error by inspecting its
/// combined output.
pub(crate) fn classify_failure(name: &str, out: &CmdOutput) -> PackageError {
    let combined = out.combined();
    let lower = combined.to_lowercase();
    let message = first_error_line(&combined);

    if matches_any(
        &lower,
        &["permission denied", "are you root", "eacces", "operation not permitted"],
    ) {
        return PackageError::PermissionDenied { message };
    }
    if matches_any(
        &lower,
        &[
            "could not get lock",
            "database is locked",
            "another process is using",
            "lock file exists",
            "waiting for cache lock",
        ],
    ) {
        return PackageError::LockContention { message };
    }
    if matches_any(
        &lower,
        &[
            "could not resolve",
            "network is unreachable",
            "connection refused",
            "connection reset",
            "temporary failure in name resolution",
            "tls handshake",
            "fetch failed",
        ],
    ) {
        return PackageError::Network { message };
    }
    if matches_any(
        &lower,
        &[
            "not found",
            "no formula",
            "no available formula",
            "unable to locate package",
            "could not find",
            "no matching package",
            "does not exist",
            "404",
        ],
    ) {
        return PackageError::NotFound {
            name: name.to_string(),
        };
    }
    if matches_any(&lower, &["dependency conflict", "conflicts with", "incompatible with"]) {
        return PackageError::DependencyConflict { message };
    }
    if matches_any(
        &lower,
        &["build failed", "compilation failed", "error[e", "make: ***", "failed to compile"],
    ) {
        return PackageError::BuildFailed { message };
    }
    PackageError::CommandFailed { message }
}

/// First non-empty line of the output, trimmed; falls back to a generic
/// message so errors are never blank.
fn first_error_line(combined: &str) -> String {
    combined
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("command exited non-zero with no output")
        .to_string()
}

/// Run a mutating command, applying the adapter's idempotent-error patterns:
/// a non-zero exit whose combined output matches any pattern is success.
pub(crate) async fn run_mutating(
    runner: &Arc<dyn CommandRunner>,
    ctx: &OpCtx,
    binary: &str,
    args: &[&str],
    package: &str,
    idempotent_patterns: &[&str],
) -> Result<(), PackageError> {
    let out = runner.run(ctx, binary, args).await?;
    if out.success() {
        return Ok(());
    }
    if matches_any(&out.combined(), idempotent_patterns) {
        tracing::debug!(binary, package, code = out.code, "non-zero exit treated as success");
        return Ok(());
    }
    Err(classify_failure(package, &out))
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
