// SPDX-License-Identifier: MIT

//! Shared command context
//!
//! Explicit construction order, everything reachable from the top:
//! runner → registry → stores → resources → orchestrator.

use crate::env;
use crate::output::OutputFormat;
use crate::reporter::TerminalReporter;
use anyhow::Context;
use rig_adapters::{Registry, SystemRunner};
use rig_core::{Config, NullReporter, OpCtx, Reporter};
use rig_engine::{DotfileResource, MultiPackageResource, Orchestrator, Resource};
use rig_storage::{DotfileScanner, LockStore};
use std::sync::Arc;

pub struct App {
    pub config: Config,
    pub registry: Arc<Registry>,
    pub lock: Arc<LockStore>,
}

impl App {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = env::config_path()?;
        let config = Config::load(&config_path)
            .with_context(|| format!("loading {}", config_path.display()))?;
        let runner = Arc::new(SystemRunner::new());
        let registry = Arc::new(Registry::with_builtins(runner, &config));
        let lock = Arc::new(LockStore::new(env::lock_path()?));
        Ok(Self {
            config,
            registry,
            lock,
        })
    }

    pub fn scanner(&self) -> anyhow::Result<DotfileScanner> {
        Ok(DotfileScanner::new(
            env::dotfiles_dir()?,
            env::home_dir()?,
            &self.config.ignore_patterns,
            &self.config.expand_directories,
        )?)
    }

    /// Resources for both domains, packages first.
    pub fn resources(&self) -> anyhow::Result<Vec<Arc<dyn Resource>>> {
        let packages = MultiPackageResource::new(
            self.registry.clone(),
            self.lock.clone(),
            self.config.package_budget(),
        );
        let dotfiles = DotfileResource::new(self.scanner()?, self.config.dotfile_budget());
        Ok(vec![Arc::new(packages), Arc::new(dotfiles)])
    }

    pub fn orchestrator(&self, format: OutputFormat) -> anyhow::Result<Orchestrator> {
        let reporter: Arc<dyn Reporter> = match format {
            OutputFormat::Text => Arc::new(TerminalReporter::new()),
            // JSON mode keeps stdout machine-readable.
            OutputFormat::Json => Arc::new(NullReporter),
        };
        Ok(Orchestrator::new(self.resources()?, reporter))
    }

    /// Root context for one command invocation, bounded by the whole-run
    /// timeout and canceled by ctrl-c.
    pub fn root_ctx(&self) -> OpCtx {
        let ctx = OpCtx::with_timeout(self.config.operation_budget());
        let canceler = ctx.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("interrupt received, canceling run");
                canceler.cancel();
            }
        });
        ctx
    }

    /// Context for one imperative adapter call.
    pub fn package_ctx(&self, root: &OpCtx) -> OpCtx {
        root.child(self.config.package_budget())
    }
}

/// Split a `manager:name` spec; a bare name uses the default manager.
/// Scoped npm names (`@scope/pkg`) are never mistaken for specs.
pub fn split_spec<'a>(spec: &'a str, default_manager: &'a str) -> (&'a str, &'a str) {
    if spec.starts_with('@') {
        return (default_manager, spec);
    }
    match spec.split_once(':') {
        Some((manager, name)) if !manager.is_empty() && !name.is_empty() => (manager, name),
        _ => (default_manager, spec),
    }
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;
