// SPDX-License-Identifier: MIT

//! Per-item operation results and the apply summary

use crate::Domain;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Terminal status of one apply item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemStatus {
    /// Already in the desired state; nothing was done.
    Unchanged,
    Installed,
    Removed,
    Deployed,
    WouldInstall,
    WouldRemove,
    WouldDeploy,
    /// Untracked item surfaced in the report; never acted on.
    Reported,
    Failed,
    Canceled,
    /// The adapter call succeeded but the lock write did not. The next
    /// apply reconciles the package as present and will not re-install it.
    InstalledLockFailed,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Unchanged => "unchanged",
            ItemStatus::Installed => "installed",
            ItemStatus::Removed => "removed",
            ItemStatus::Deployed => "deployed",
            ItemStatus::WouldInstall => "would-install",
            ItemStatus::WouldRemove => "would-remove",
            ItemStatus::WouldDeploy => "would-deploy",
            ItemStatus::Reported => "reported",
            ItemStatus::Failed => "failed",
            ItemStatus::Canceled => "canceled",
            ItemStatus::InstalledLockFailed => "installed-but-lock-failed",
        }
    }

    /// True for statuses that count against the exit code.
    pub fn is_failure(&self) -> bool {
        matches!(self, ItemStatus::Failed | ItemStatus::Canceled)
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single scheduled item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationResult {
    pub name: String,
    pub domain: Domain,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager: Option<String>,
    pub status: ItemStatus,
    /// Error kind, e.g. "manager-unavailable" or "package-not-found".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl OperationResult {
    pub fn ok(name: impl Into<String>, domain: Domain, status: ItemStatus) -> Self {
        Self {
            name: name.into(),
            domain,
            manager: None,
            status,
            error_kind: None,
            error: None,
            suggestion: None,
        }
    }

    pub fn with_manager(mut self, manager: impl Into<String>) -> Self {
        self.manager = Some(manager.into());
        self
    }

    pub fn failed(
        name: impl Into<String>,
        domain: Domain,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            domain,
            manager: None,
            status: ItemStatus::Failed,
            error_kind: Some(kind.into()),
            error: Some(message.into()),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Aggregated counts across one apply run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub missing: usize,
    pub installed: usize,
    pub removed: usize,
    pub deployed: usize,
    pub unchanged: usize,
    pub failed: usize,
    pub canceled: usize,
    pub would_install: usize,
    pub would_remove: usize,
    pub would_deploy: usize,
    pub reported: usize,
}

/// Per-manager slice of the totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerTotals {
    pub installed: usize,
    pub failed: usize,
    pub would_install: usize,
    pub unchanged: usize,
}

/// Everything a renderer needs for a complete apply report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplySummary {
    pub dry_run: bool,
    pub duration_ms: u64,
    pub results: Vec<OperationResult>,
}

impl ApplySummary {
    pub fn push(&mut self, result: OperationResult) {
        self.results.push(result);
    }

    pub fn totals(&self) -> Totals {
        let mut t = Totals::default();
        for r in &self.results {
            match r.status {
                ItemStatus::Unchanged => t.unchanged += 1,
                ItemStatus::Installed | ItemStatus::InstalledLockFailed => t.installed += 1,
                ItemStatus::Removed => t.removed += 1,
                ItemStatus::Deployed => t.deployed += 1,
                ItemStatus::WouldInstall => t.would_install += 1,
                ItemStatus::WouldRemove => t.would_remove += 1,
                ItemStatus::WouldDeploy => t.would_deploy += 1,
                ItemStatus::Reported => t.reported += 1,
                ItemStatus::Failed => t.failed += 1,
                ItemStatus::Canceled => t.canceled += 1,
            }
        }
        t.missing = t.installed + t.deployed + t.failed + t.canceled + t.would_install + t.would_deploy;
        t
    }

    /// Totals broken down by manager, package results only.
    pub fn per_manager(&self) -> BTreeMap<String, ManagerTotals> {
        let mut map: BTreeMap<String, ManagerTotals> = BTreeMap::new();
        for r in &self.results {
            let Some(manager) = &r.manager else { continue };
            let entry = map.entry(manager.clone()).or_default();
            match r.status {
                ItemStatus::Installed | ItemStatus::InstalledLockFailed => entry.installed += 1,
                ItemStatus::Failed | ItemStatus::Canceled => entry.failed += 1,
                ItemStatus::WouldInstall => entry.would_install += 1,
                ItemStatus::Unchanged => entry.unchanged += 1,
                _ => {}
            }
        }
        map
    }

    /// True when no item failed or was canceled.
    pub fn success(&self) -> bool {
        self.results.iter().all(|r| !r.status.is_failure())
    }
}

#[cfg(test)]
#[path = "outcome_tests.rs"]
mod tests;
