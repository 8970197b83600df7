// SPDX-License-Identifier: MIT

//! Go adapter (`go install` binaries)
//!
//! Listing scans the Go bin directory and keeps every file whose embedded
//! module metadata is readable. The lock id uses the basename of the module
//! path (`github.com/x/y/cmd/z` → `z`) while `source_path` metadata
//! preserves the requested path verbatim so reinstalls are reproducible.

use super::{
    binary_on_path, run_mutating, InstalledPackage, LockIdentity, PackageError, PackageInfo,
    PackageManager,
};
use crate::runner::CommandRunner;
use async_trait::async_trait;
use rig_core::OpCtx;
use std::path::PathBuf;
use std::sync::Arc;

/// Adapter for binaries installed with `go install`.
pub struct GoManager {
    runner: Arc<dyn CommandRunner>,
}

/// Module metadata embedded in one Go binary.
#[derive(Debug, Clone, PartialEq, Eq)]
struct BinaryModule {
    package_path: String,
    version: Option<String>,
}

impl GoManager {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// Basename of a module path, with any `@version` suffix and trailing
    /// `/vN` major-version segment stripped.
    fn base_name(source: &str) -> String {
        let path = source.split('@').next().unwrap_or(source);
        let mut segments = path.split('/').rev();
        let last = segments.next().unwrap_or(path);
        if last.len() > 1
            && last.starts_with('v')
            && last[1..].chars().all(|c| c.is_ascii_digit())
        {
            segments.next().unwrap_or(last).to_string()
        } else {
            last.to_string()
        }
    }

    /// Resolve the Go bin directory: `$GOBIN`, then `go env GOBIN`, then
    /// `go env GOPATH`/bin, then `~/go/bin`.
    async fn bin_dir(&self, ctx: &OpCtx) -> Result<PathBuf, PackageError> {
        if let Some(gobin) = std::env::var_os("GOBIN").filter(|v| !v.is_empty()) {
            return Ok(PathBuf::from(gobin));
        }
        let out = self.runner.run(ctx, "go", &["env", "GOBIN"]).await?;
        let gobin = out.stdout_str().trim().to_string();
        if out.success() && !gobin.is_empty() {
            return Ok(PathBuf::from(gobin));
        }
        let out = self.runner.run(ctx, "go", &["env", "GOPATH"]).await?;
        let gopath = out.stdout_str().trim().to_string();
        if out.success() && !gopath.is_empty() {
            return Ok(PathBuf::from(gopath).join("bin"));
        }
        dirs::home_dir()
            .map(|home| home.join("go").join("bin"))
            .ok_or_else(|| PackageError::parse("go", "cannot determine the Go bin directory"))
    }

    /// Read the embedded module metadata of one binary; `None` when the
    /// file is not a Go binary.
    async fn read_module(&self, ctx: &OpCtx, file: &std::path::Path) -> Option<BinaryModule> {
        let file_arg = file.to_string_lossy();
        let out = self
            .runner
            .run(ctx, "go", &["version", "-m", file_arg.as_ref()])
            .await
            .ok()?;
        if !out.success() {
            return None;
        }
        let stdout = out.stdout_str();
        let mut package_path = None;
        let mut version = None;
        for line in stdout.lines() {
            let mut fields = line.split_whitespace();
            match fields.next() {
                Some("path") => package_path = fields.next().map(str::to_string),
                Some("mod") => {
                    fields.next();
                    version = fields.next().map(str::to_string);
                }
                _ => {}
            }
        }
        package_path.map(|package_path| BinaryModule {
            package_path,
            version,
        })
    }

    async fn scan_bin_dir(
        &self,
        ctx: &OpCtx,
    ) -> Result<Vec<(PathBuf, BinaryModule)>, PackageError> {
        let bin_dir = self.bin_dir(ctx).await?;
        let entries = match std::fs::read_dir(&bin_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(PackageError::parse(
                    "go",
                    format!("cannot read {}: {e}", bin_dir.display()),
                ))
            }
        };
        let mut binaries = Vec::new();
        let mut files: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file())
            .collect();
        files.sort();
        for file in files {
            if ctx.is_canceled() {
                return Err(crate::runner::RunnerError::Canceled.into());
            }
            if let Some(module) = self.read_module(ctx, &file).await {
                binaries.push((file, module));
            }
        }
        Ok(binaries)
    }
}

#[async_trait]
impl PackageManager for GoManager {
    fn name(&self) -> &str {
        "go"
    }

    fn install_hint(&self) -> String {
        "install go from https://go.dev/dl".to_string()
    }

    fn supports_search(&self) -> bool {
        false
    }

    fn lock_identity(&self, requested: &str) -> LockIdentity {
        let mut identity = LockIdentity::plain(&Self::base_name(requested));
        if requested.contains('/') {
            let source = requested.split('@').next().unwrap_or(requested);
            identity
                .metadata
                .insert("source_path".to_string(), source.to_string());
        }
        identity
    }

    async fn is_available(&self, _ctx: &OpCtx) -> Result<bool, PackageError> {
        Ok(binary_on_path(&self.runner, "go"))
    }

    async fn list_installed(&self, ctx: &OpCtx) -> Result<Vec<InstalledPackage>, PackageError> {
        Ok(self
            .scan_bin_dir(ctx)
            .await?
            .into_iter()
            .map(|(_file, module)| InstalledPackage {
                name: Self::base_name(&module.package_path),
                version: module.version,
            })
            .collect())
    }

    async fn install(&self, ctx: &OpCtx, name: &str) -> Result<(), PackageError> {
        let spec = if name.contains('@') {
            name.to_string()
        } else {
            format!("{name}@latest")
        };
        run_mutating(&self.runner, ctx, "go", &["install", &spec], name, &[]).await
    }

    /// Removes the installed binary. Refuses to touch files that carry no
    /// Go module metadata.
    async fn uninstall(&self, ctx: &OpCtx, name: &str) -> Result<(), PackageError> {
        let target = Self::base_name(name);
        let binaries = self.scan_bin_dir(ctx).await?;
        let found = binaries
            .iter()
            .find(|(file, module)| {
                file.file_name().is_some_and(|f| f.to_string_lossy() == target)
                    || Self::base_name(&module.package_path) == target
            });
        let Some((file, _module)) = found else {
            // Already absent is success.
            let bin_dir = self.bin_dir(ctx).await?;
            let stray = bin_dir.join(&target);
            if stray.is_file() {
                return Err(PackageError::CommandFailed {
                    message: format!(
                        "{} is not a Go-installed binary; refusing to remove it",
                        stray.display()
                    ),
                });
            }
            return Ok(());
        };
        std::fs::remove_file(file).map_err(|e| PackageError::CommandFailed {
            message: format!("cannot remove {}: {e}", file.display()),
        })
    }

    async fn info(&self, ctx: &OpCtx, name: &str) -> Result<PackageInfo, PackageError> {
        let target = Self::base_name(name);
        let binaries = self.scan_bin_dir(ctx).await?;
        let found = binaries
            .iter()
            .find(|(_file, module)| Self::base_name(&module.package_path) == target)
            .ok_or(PackageError::NotFound {
                name: name.to_string(),
            })?;
        Ok(PackageInfo {
            name: target,
            version: found.1.version.clone(),
            description: Some(found.1.package_path.clone()),
            homepage: None,
            dependencies: Vec::new(),
            installed: true,
            manager: "go".to_string(),
        })
    }

    async fn upgrade(&self, ctx: &OpCtx, names: &[String]) -> Result<(), PackageError> {
        if names.is_empty() {
            return Err(PackageError::unsupported("go", "upgrade-all"));
        }
        for name in names {
            self.install(ctx, name).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "golang_tests.rs"]
mod tests;
