// SPDX-License-Identifier: MIT

//! Config-driven adapter for managers without a builtin
//!
//! Any manager name in the config that is not recognized instantiates one
//! of these; the YAML descriptor supplies the commands, parse strategy, and
//! idempotent-error patterns.

use super::{
    binary_on_path, matches_any, classify_failure, parse, InstalledPackage, PackageError,
    PackageManager,
};
use crate::runner::CommandRunner;
use async_trait::async_trait;
use rig_core::{ManagerSpec, OpCtx, ParseStrategy};
use std::sync::Arc;

/// Adapter whose behavior is entirely described by a [`ManagerSpec`].
pub struct GenericManager {
    name: String,
    spec: ManagerSpec,
    runner: Arc<dyn CommandRunner>,
}

impl GenericManager {
    pub fn new(name: impl Into<String>, spec: ManagerSpec, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            name: name.into(),
            spec,
            runner,
        }
    }

    fn binary(&self) -> &str {
        self.spec.binary.as_deref().unwrap_or(&self.name)
    }

    async fn run_spec(
        &self,
        ctx: &OpCtx,
        spec: &rig_core::CommandSpec,
        package: &str,
    ) -> Result<(), PackageError> {
        let args = spec.render(package);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        let out = self.runner.run(ctx, self.binary(), &args).await?;
        if out.success() {
            return Ok(());
        }
        let patterns: Vec<&str> = spec.idempotent_errors.iter().map(String::as_str).collect();
        if matches_any(&out.combined(), &patterns) {
            tracing::debug!(
                manager = %self.name,
                package,
                code = out.code,
                "non-zero exit treated as success"
            );
            return Ok(());
        }
        Err(classify_failure(package, &out))
    }

    fn missing_op(&self, operation: &'static str) -> PackageError {
        PackageError::Unsupported {
            manager: self.name.clone(),
            operation,
        }
    }
}

#[async_trait]
impl PackageManager for GenericManager {
    fn name(&self) -> &str {
        &self.name
    }

    fn install_hint(&self) -> String {
        self.spec
            .install_hint
            .clone()
            .unwrap_or_else(|| format!("install {} and put it on PATH", self.binary()))
    }

    fn dependencies(&self) -> Vec<String> {
        self.spec.depends_on.clone()
    }

    fn supports_search(&self) -> bool {
        false
    }

    async fn is_available(&self, _ctx: &OpCtx) -> Result<bool, PackageError> {
        Ok(binary_on_path(&self.runner, self.binary()))
    }

    async fn list_installed(&self, ctx: &OpCtx) -> Result<Vec<InstalledPackage>, PackageError> {
        let Some(list) = &self.spec.list else {
            return Err(self.missing_op("list"));
        };
        let args: Vec<&str> = list.command.iter().map(String::as_str).collect();
        let stdout = self.runner.execute(ctx, self.binary(), &args).await?;
        let text = String::from_utf8_lossy(&stdout);
        match list.parse {
            ParseStrategy::Lines => Ok(parse::lines(&text)),
            ParseStrategy::Json => {
                parse::json_array(&self.name, &text, list.json_field.as_deref())
            }
            ParseStrategy::JsonMap => {
                parse::json_map(&self.name, &text, list.json_field.as_deref())
            }
        }
    }

    async fn install(&self, ctx: &OpCtx, name: &str) -> Result<(), PackageError> {
        let Some(spec) = self.spec.install.clone() else {
            return Err(self.missing_op("install"));
        };
        self.run_spec(ctx, &spec, name).await
    }

    async fn uninstall(&self, ctx: &OpCtx, name: &str) -> Result<(), PackageError> {
        let Some(spec) = self.spec.uninstall.clone() else {
            return Err(self.missing_op("uninstall"));
        };
        self.run_spec(ctx, &spec, name).await
    }

    async fn upgrade(&self, ctx: &OpCtx, names: &[String]) -> Result<(), PackageError> {
        let Some(spec) = self.spec.upgrade.clone() else {
            return Err(self.missing_op("upgrade"));
        };
        if names.is_empty() {
            return self.run_spec(ctx, &spec, "").await;
        }
        for name in names {
            self.run_spec(ctx, &spec, name).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "generic_tests.rs"]
mod tests;
