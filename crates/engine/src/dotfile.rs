// SPDX-License-Identifier: MIT

//! Dotfile resource

use crate::{EngineError, Resource};
use async_trait::async_trait;
use rig_core::{
    reconcile_dotfiles, ActualItem, ConfiguredItem, Domain, Item, ItemState, ItemStatus, OpCtx,
    OperationResult, Reconciliation,
};
use rig_storage::DotfileScanner;
use std::time::Duration;

/// The managed dotfile tree behind the uniform resource contract.
pub struct DotfileResource {
    scanner: DotfileScanner,
    timeout: Duration,
}

impl DotfileResource {
    pub fn new(scanner: DotfileScanner, timeout: Duration) -> Self {
        Self { scanner, timeout }
    }

    fn configured_from(item: &Item) -> ConfiguredItem {
        ConfiguredItem {
            name: item.name.clone(),
            manager: String::new(),
            version: None,
            path: item.path.clone(),
            metadata: item.metadata.clone(),
        }
    }
}

#[async_trait]
impl Resource for DotfileResource {
    fn domain(&self) -> Domain {
        Domain::Dotfile
    }

    fn label(&self) -> &'static str {
        "dotfiles"
    }

    fn item_timeout(&self) -> Duration {
        self.timeout
    }

    fn desired(&self) -> Result<Vec<ConfiguredItem>, EngineError> {
        Ok(self.scanner.configured()?)
    }

    async fn actual(&self, ctx: &OpCtx) -> Result<Vec<ActualItem>, EngineError> {
        if ctx.is_canceled() {
            return Ok(Vec::new());
        }
        let configured = self.scanner.configured()?;
        Ok(self.scanner.actual(&configured))
    }

    fn reconcile(
        &self,
        configured: &[ConfiguredItem],
        actual: &[ActualItem],
    ) -> Result<Reconciliation, EngineError> {
        let drifted = self.scanner.drifted(configured);
        Ok(reconcile_dotfiles(configured, actual, &drifted))
    }

    /// Missing deployments first, then drift repairs, both in scan order.
    fn plan(&self, reconciliation: &Reconciliation) -> Result<Vec<Item>, EngineError> {
        let mut plan = reconciliation.missing.clone();
        plan.extend(
            reconciliation
                .managed
                .iter()
                .filter(|i| i.state == ItemState::Degraded)
                .cloned(),
        );
        Ok(plan)
    }

    async fn apply(&self, ctx: &OpCtx, item: &Item, dry_run: bool) -> OperationResult {
        match item.state {
            ItemState::Missing | ItemState::Degraded => {
                if dry_run {
                    return OperationResult::ok(
                        &item.name,
                        Domain::Dotfile,
                        ItemStatus::WouldDeploy,
                    );
                }
                if ctx.is_canceled() {
                    return OperationResult {
                        status: ItemStatus::Canceled,
                        error_kind: Some("canceled".to_string()),
                        ..OperationResult::ok(&item.name, Domain::Dotfile, ItemStatus::Canceled)
                    };
                }
                match self.scanner.deploy(&Self::configured_from(item)) {
                    Ok(()) => {
                        OperationResult::ok(&item.name, Domain::Dotfile, ItemStatus::Deployed)
                    }
                    Err(e) => {
                        OperationResult::failed(&item.name, Domain::Dotfile, "io", e.to_string())
                    }
                }
            }
            _ => OperationResult::ok(&item.name, Domain::Dotfile, ItemStatus::Unchanged),
        }
    }
}

#[cfg(test)]
#[path = "dotfile_tests.rs"]
mod tests;
