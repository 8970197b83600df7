// SPDX-License-Identifier: MIT

//! Uniform Desired / Actual / Apply abstraction
//!
//! Packages and dotfiles both implement [`Resource`], keeping the
//! orchestrator agnostic to domain and manager. Adding a new domain is
//! adding one implementation.

use crate::EngineError;
use async_trait::async_trait;
use rig_core::{ActualItem, ConfiguredItem, Domain, Item, OpCtx, OperationResult, Reconciliation};
use std::time::Duration;

/// One reconcilable domain.
#[async_trait]
pub trait Resource: Send + Sync {
    fn domain(&self) -> Domain;

    /// Human label for stage reporting ("packages", "dotfiles").
    fn label(&self) -> &'static str;

    /// Per-item deadline applied by the orchestrator.
    fn item_timeout(&self) -> Duration;

    /// The desired state, from the lock or the managed tree.
    fn desired(&self) -> Result<Vec<ConfiguredItem>, EngineError>;

    /// The observed state. Implementations may fan out internally but must
    /// respect `ctx` cancellation.
    async fn actual(&self, ctx: &OpCtx) -> Result<Vec<ActualItem>, EngineError>;

    /// Classify configured against actual.
    fn reconcile(
        &self,
        configured: &[ConfiguredItem],
        actual: &[ActualItem],
    ) -> Result<Reconciliation, EngineError>;

    /// The items needing corrective action, in apply order. Ordering
    /// failures (dependency cycles) are structural.
    fn plan(&self, reconciliation: &Reconciliation) -> Result<Vec<Item>, EngineError>;

    /// Execute one corrective action. Never fails the run: errors are
    /// captured in the returned result.
    async fn apply(&self, ctx: &OpCtx, item: &Item, dry_run: bool) -> OperationResult;
}
