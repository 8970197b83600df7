// SPDX-License-Identifier: MIT

//! Apply orchestration
//!
//! Drives each resource through desired → actual → reconcile → plan →
//! apply, reporting progress as it goes. Item failures are isolated; only
//! structural errors (cycles, unreadable lock, bad config) abort the run.

use crate::{EngineError, Resource};
use rig_core::{
    ApplySummary, Clock, Domain, Item, ItemState, ItemStatus, OpCtx, OperationResult,
    Reconciliation, Reporter, SystemClock,
};
use std::sync::Arc;

/// Which domains a run covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    #[default]
    All,
    Packages,
    Dotfiles,
}

impl Scope {
    pub fn includes(&self, domain: Domain) -> bool {
        match self {
            Scope::All => true,
            Scope::Packages => domain == Domain::Package,
            Scope::Dotfiles => domain == Domain::Dotfile,
        }
    }
}

/// Drives reconciliation and corrective actions across resources.
pub struct Orchestrator<C: Clock = SystemClock> {
    resources: Vec<Arc<dyn Resource>>,
    reporter: Arc<dyn Reporter>,
    clock: C,
}

impl Orchestrator<SystemClock> {
    pub fn new(resources: Vec<Arc<dyn Resource>>, reporter: Arc<dyn Reporter>) -> Self {
        Self::with_clock(resources, reporter, SystemClock)
    }
}

impl<C: Clock> Orchestrator<C> {
    pub fn with_clock(
        resources: Vec<Arc<dyn Resource>>,
        reporter: Arc<dyn Reporter>,
        clock: C,
    ) -> Self {
        Self {
            resources,
            reporter,
            clock,
        }
    }

    fn scoped(&self, scope: Scope) -> impl Iterator<Item = &Arc<dyn Resource>> {
        self.resources
            .iter()
            .filter(move |r| scope.includes(r.domain()))
    }

    /// Reconcile without applying; the status report.
    pub async fn status(
        &self,
        ctx: &OpCtx,
        scope: Scope,
    ) -> Result<Vec<Reconciliation>, EngineError> {
        let mut reports = Vec::new();
        for resource in self.scoped(scope) {
            self.reporter
                .stage_update(&format!("Checking {}", resource.label()));
            let configured = resource.desired()?;
            let actual = resource.actual(ctx).await?;
            reports.push(resource.reconcile(&configured, &actual)?);
        }
        Ok(reports)
    }

    /// Reconcile and execute corrective actions.
    pub async fn apply(
        &self,
        ctx: &OpCtx,
        scope: Scope,
        dry_run: bool,
    ) -> Result<ApplySummary, EngineError> {
        let started = self.clock.now();
        let mut summary = ApplySummary {
            dry_run,
            ..ApplySummary::default()
        };

        for resource in self.scoped(scope) {
            self.reporter
                .stage_update(&format!("Reconciling {}", resource.label()));
            let configured = resource.desired()?;
            let actual = resource.actual(ctx).await?;
            let reconciliation = resource.reconcile(&configured, &actual)?;
            let plan = resource.plan(&reconciliation)?;

            // Converged and untracked items only need reporting.
            for item in &reconciliation.managed {
                if item.state != ItemState::Degraded {
                    summary.push(unchanged_result(item));
                }
            }
            for item in &reconciliation.untracked {
                summary.push(reported_result(item));
            }

            if !plan.is_empty() {
                let verb = if dry_run { "Planning" } else { "Applying" };
                self.reporter
                    .stage_update(&format!("{verb} {}", resource.label()));
            }
            let total = plan.len();
            for (index, item) in plan.iter().enumerate() {
                if ctx.is_canceled() {
                    summary.push(canceled_result(item));
                    continue;
                }
                self.reporter.progress_update(
                    index + 1,
                    total,
                    progress_verb(resource.domain(), dry_run),
                    &item.name,
                );
                let item_ctx = ctx.child(resource.item_timeout());
                let result = resource.apply(&item_ctx, item, dry_run).await;
                self.reporter.item_result(&result);
                summary.push(result);
            }
        }

        summary.duration_ms = self
            .clock
            .now()
            .saturating_duration_since(started)
            .as_millis() as u64;
        Ok(summary)
    }
}

fn progress_verb(domain: Domain, dry_run: bool) -> &'static str {
    match (domain, dry_run) {
        (Domain::Package, false) => "installing",
        (Domain::Package, true) => "would install",
        (Domain::Dotfile, false) => "deploying",
        (Domain::Dotfile, true) => "would deploy",
    }
}

fn unchanged_result(item: &Item) -> OperationResult {
    let mut result = OperationResult::ok(&item.name, item.domain, ItemStatus::Unchanged);
    if !item.manager.is_empty() {
        result = result.with_manager(&item.manager);
    }
    result
}

fn reported_result(item: &Item) -> OperationResult {
    let mut result = OperationResult::ok(&item.name, item.domain, ItemStatus::Reported);
    if !item.manager.is_empty() {
        result = result.with_manager(&item.manager);
    }
    result
}

fn canceled_result(item: &Item) -> OperationResult {
    let mut result = OperationResult::ok(&item.name, item.domain, ItemStatus::Canceled);
    result.error_kind = Some("canceled".to_string());
    if !item.manager.is_empty() {
        result = result.with_manager(&item.manager);
    }
    result
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
