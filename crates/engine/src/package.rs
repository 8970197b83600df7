// SPDX-License-Identifier: MIT

//! Package resources
//!
//! [`PackageResource`] binds one manager to the lock; the
//! [`MultiPackageResource`] aggregates every registered manager, fanning
//! discovery out across a bounded worker pool and ordering corrective
//! actions by manager dependencies.

use crate::{EngineError, Resource};
use async_trait::async_trait;
use parking_lot::Mutex;
use rig_adapters::{resolve_order, PackageError, PackageManager, Registry};
use rig_core::{
    reconcile, ActualItem, ConfiguredItem, Domain, Item, ItemState, ItemStatus, OpCtx,
    OperationResult, Reconciliation,
};
use rig_storage::LockStore;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Reserved metadata keys that live outside the free-form metadata map.
const RESERVED_KEYS: [&str; 3] = ["manager", "name", "version"];

fn configured_from_entry(entry: &rig_storage::ResourceEntry) -> ConfiguredItem {
    let mut item = ConfiguredItem::package(entry.manager(), entry.name());
    item.version = entry.version().map(str::to_string);
    item.metadata = entry
        .metadata
        .iter()
        .filter(|(k, _)| !RESERVED_KEYS.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    item
}

fn failed_from(item: &Item, error: &PackageError) -> OperationResult {
    let status = match error.kind() {
        "canceled" => ItemStatus::Canceled,
        _ => ItemStatus::Failed,
    };
    OperationResult {
        name: item.name.clone(),
        domain: Domain::Package,
        manager: Some(item.manager.clone()),
        status,
        error_kind: Some(error.kind().to_string()),
        error: Some(error.to_string()),
        suggestion: error.suggestion(),
    }
}

/// One manager bound to the lock.
pub struct PackageResource {
    manager: Arc<dyn PackageManager>,
    lock: Arc<LockStore>,
    timeout: Duration,
    /// Availability probed once per run; a missing binary is not retried.
    available: Mutex<Option<bool>>,
}

impl PackageResource {
    pub fn new(
        manager: Arc<dyn PackageManager>,
        lock: Arc<LockStore>,
        timeout: Duration,
    ) -> Self {
        Self {
            manager,
            lock,
            timeout,
            available: Mutex::new(None),
        }
    }

    pub fn manager_name(&self) -> &str {
        self.manager.name()
    }

    async fn availability(&self, ctx: &OpCtx) -> Result<bool, PackageError> {
        if let Some(known) = *self.available.lock() {
            return Ok(known);
        }
        let available = self.manager.is_available(ctx).await?;
        *self.available.lock() = Some(available);
        Ok(available)
    }

    fn unavailable_result(&self, item: &Item) -> OperationResult {
        let error = PackageError::ManagerUnavailable {
            manager: self.manager.name().to_string(),
            hint: self.manager.install_hint(),
        };
        failed_from(item, &error)
    }

    /// The spec handed to the manager CLI: go reinstalls need the full
    /// module path preserved in the lock, everything else uses the name.
    fn install_spec(item: &Item) -> &str {
        item.metadata
            .get("source_path")
            .map(String::as_str)
            .unwrap_or(&item.name)
    }

    async fn apply_install(&self, ctx: &OpCtx, item: &Item) -> OperationResult {
        match self.availability(ctx).await {
            Ok(true) => {}
            Ok(false) => return self.unavailable_result(item),
            Err(e) => return failed_from(item, &e),
        }

        let spec = Self::install_spec(item);
        if let Err(e) = self.manager.install(ctx, spec).await {
            return failed_from(item, &e);
        }

        let version = self.manager.installed_version(ctx, &item.name).await.ok();
        let identity = self.manager.lock_identity(spec);
        let mut metadata = item.metadata.clone();
        metadata.remove("version");
        metadata.extend(identity.metadata);

        match self.lock.add_package(
            self.manager.name(),
            &identity.name,
            version.as_deref(),
            metadata,
        ) {
            Ok(()) => OperationResult::ok(&item.name, Domain::Package, ItemStatus::Installed)
                .with_manager(&item.manager),
            Err(e) => {
                tracing::warn!(
                    manager = self.manager.name(),
                    package = %item.name,
                    error = %e,
                    "installed but lock write failed"
                );
                let mut result = OperationResult::ok(
                    &item.name,
                    Domain::Package,
                    ItemStatus::InstalledLockFailed,
                )
                .with_manager(&item.manager);
                result.error = Some(e.to_string());
                result
            }
        }
    }
}

#[async_trait]
impl Resource for PackageResource {
    fn domain(&self) -> Domain {
        Domain::Package
    }

    fn label(&self) -> &'static str {
        "packages"
    }

    fn item_timeout(&self) -> Duration {
        self.timeout
    }

    fn desired(&self) -> Result<Vec<ConfiguredItem>, EngineError> {
        let lock = self.lock.read()?;
        Ok(lock
            .packages_for(self.manager.name())
            .into_iter()
            .map(configured_from_entry)
            .collect())
    }

    async fn actual(&self, ctx: &OpCtx) -> Result<Vec<ActualItem>, EngineError> {
        match self.availability(ctx).await {
            Ok(true) => {}
            // A missing manager contributes no observations; its desired
            // items surface as Missing and fail with the install hint.
            Ok(false) => return Ok(Vec::new()),
            Err(e) => {
                tracing::warn!(manager = self.manager.name(), error = %e, "availability probe failed");
                return Ok(Vec::new());
            }
        }
        match self.manager.list_installed(ctx).await {
            Ok(packages) => Ok(packages
                .into_iter()
                .map(|p| {
                    let mut actual = ActualItem::package(self.manager.name(), p.name);
                    actual.version = p.version;
                    actual
                })
                .collect()),
            Err(e) => {
                tracing::warn!(manager = self.manager.name(), error = %e, "list failed");
                Ok(Vec::new())
            }
        }
    }

    fn reconcile(
        &self,
        configured: &[ConfiguredItem],
        actual: &[ActualItem],
    ) -> Result<Reconciliation, EngineError> {
        Ok(reconcile(configured, actual, Domain::Package))
    }

    fn plan(&self, reconciliation: &Reconciliation) -> Result<Vec<Item>, EngineError> {
        Ok(reconciliation.missing.clone())
    }

    async fn apply(&self, ctx: &OpCtx, item: &Item, dry_run: bool) -> OperationResult {
        match item.state {
            ItemState::Missing => {
                if dry_run {
                    OperationResult::ok(&item.name, Domain::Package, ItemStatus::WouldInstall)
                        .with_manager(&item.manager)
                } else {
                    self.apply_install(ctx, item).await
                }
            }
            _ => OperationResult::ok(&item.name, Domain::Package, ItemStatus::Unchanged)
                .with_manager(&item.manager),
        }
    }
}

/// Every registered manager behind one resource.
pub struct MultiPackageResource {
    registry: Arc<Registry>,
    lock: Arc<LockStore>,
    resources: BTreeMap<String, Arc<PackageResource>>,
    timeout: Duration,
    limit: usize,
}

impl MultiPackageResource {
    pub fn new(registry: Arc<Registry>, lock: Arc<LockStore>, timeout: Duration) -> Self {
        let limit = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
            .min(4);
        Self::with_limit(registry, lock, timeout, limit)
    }

    pub fn with_limit(
        registry: Arc<Registry>,
        lock: Arc<LockStore>,
        timeout: Duration,
        limit: usize,
    ) -> Self {
        let resources = registry
            .names()
            .into_iter()
            .filter_map(|name| {
                registry.get(&name).map(|manager| {
                    (
                        name,
                        Arc::new(PackageResource::new(manager, lock.clone(), timeout)),
                    )
                })
            })
            .collect();
        Self {
            registry,
            lock,
            resources,
            timeout,
            limit: limit.max(1),
        }
    }
}

#[async_trait]
impl Resource for MultiPackageResource {
    fn domain(&self) -> Domain {
        Domain::Package
    }

    fn label(&self) -> &'static str {
        "packages"
    }

    fn item_timeout(&self) -> Duration {
        self.timeout
    }

    fn desired(&self) -> Result<Vec<ConfiguredItem>, EngineError> {
        let lock = self.lock.read()?;
        Ok(lock
            .resources
            .iter()
            .filter(|e| e.kind == Domain::Package.as_str())
            .map(configured_from_entry)
            .collect())
    }

    /// Bounded fan-out across managers: listing is read-only and safe to
    /// parallelize, unlike mutations.
    async fn actual(&self, ctx: &OpCtx) -> Result<Vec<ActualItem>, EngineError> {
        let semaphore = Arc::new(Semaphore::new(self.limit));
        let mut tasks: JoinSet<(String, Vec<ActualItem>)> = JoinSet::new();

        for (name, resource) in &self.resources {
            let name = name.clone();
            let resource = resource.clone();
            let ctx = ctx.child(self.timeout);
            let semaphore = semaphore.clone();
            tasks.spawn(async move {
                let _permit = semaphore.acquire().await;
                if ctx.is_canceled() {
                    return (name, Vec::new());
                }
                let observed = resource.actual(&ctx).await.unwrap_or_default();
                (name, observed)
            });
        }

        let mut by_manager: BTreeMap<String, Vec<ActualItem>> = BTreeMap::new();
        while let Some(joined) = tasks.join_next().await {
            if let Ok((name, observed)) = joined {
                by_manager.insert(name, observed);
            }
        }
        Ok(by_manager.into_values().flatten().collect())
    }

    fn reconcile(
        &self,
        configured: &[ConfiguredItem],
        actual: &[ActualItem],
    ) -> Result<Reconciliation, EngineError> {
        Ok(reconcile(configured, actual, Domain::Package))
    }

    /// Group missing packages by manager, then order managers
    /// topologically so a dependency manager is handled before its
    /// dependents. Within one manager, insertion order is kept and
    /// processing is sequential.
    fn plan(&self, reconciliation: &Reconciliation) -> Result<Vec<Item>, EngineError> {
        let mut by_manager: BTreeMap<String, Vec<Item>> = BTreeMap::new();
        for item in &reconciliation.missing {
            by_manager
                .entry(item.manager.clone())
                .or_default()
                .push(item.clone());
        }
        let managers: BTreeSet<String> = by_manager.keys().cloned().collect();
        let order = resolve_order(&self.registry, &managers)?;

        let mut plan = Vec::with_capacity(reconciliation.missing.len());
        for manager in order {
            if let Some(items) = by_manager.remove(&manager) {
                plan.extend(items);
            }
        }
        Ok(plan)
    }

    async fn apply(&self, ctx: &OpCtx, item: &Item, dry_run: bool) -> OperationResult {
        match self.resources.get(&item.manager) {
            Some(resource) => resource.apply(ctx, item, dry_run).await,
            None => {
                let error = PackageError::ManagerUnavailable {
                    manager: item.manager.clone(),
                    hint: format!("no adapter is registered for {:?}", item.manager),
                };
                failed_from(item, &error)
            }
        }
    }
}

#[cfg(test)]
#[path = "package_tests.rs"]
mod tests;
