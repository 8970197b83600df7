// SPDX-License-Identifier: MIT

//! Manager registry
//!
//! An explicit value constructed once per invocation, never process-global.
//! Builtins are registered first; config descriptors for unrecognized names
//! become generic adapters.

use crate::managers::{
    AptManager, BrewManager, CargoManager, ComposerManager, CondaManager, GemManager,
    GenericManager, GoManager, NodeManager, PackageManager, PipxManager, PixiManager, UvManager,
};
use crate::runner::CommandRunner;
use rig_core::Config;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Maps manager names to adapters bound to one command runner.
#[derive(Default)]
pub struct Registry {
    managers: BTreeMap<String, Arc<dyn PackageManager>>,
}

impl Registry {
    /// An empty registry; tests compose their own.
    pub fn new() -> Self {
        Self::default()
    }

    /// All builtin adapters plus a generic adapter per unrecognized config
    /// manager.
    pub fn with_builtins(runner: Arc<dyn CommandRunner>, config: &Config) -> Self {
        let mut registry = Self::new();
        registry.insert(Arc::new(BrewManager::new(runner.clone())));
        registry.insert(Arc::new(NodeManager::npm(runner.clone())));
        registry.insert(Arc::new(NodeManager::pnpm(runner.clone())));
        registry.insert(Arc::new(NodeManager::bun(runner.clone())));
        registry.insert(Arc::new(CargoManager::new(runner.clone())));
        registry.insert(Arc::new(GoManager::new(runner.clone())));
        registry.insert(Arc::new(UvManager::new(runner.clone())));
        registry.insert(Arc::new(PipxManager::new(runner.clone())));
        registry.insert(Arc::new(GemManager::new(runner.clone())));
        registry.insert(Arc::new(ComposerManager::new(runner.clone())));
        registry.insert(Arc::new(CondaManager::new(runner.clone())));
        registry.insert(Arc::new(AptManager::new(runner.clone())));
        registry.insert(Arc::new(PixiManager::new(runner.clone())));

        for (name, spec) in &config.managers {
            if !registry.contains(name) {
                registry.insert(Arc::new(GenericManager::new(
                    name.clone(),
                    spec.clone(),
                    runner.clone(),
                )));
            }
        }
        registry
    }

    /// Register an adapter, replacing any previous one of the same name.
    pub fn insert(&mut self, manager: Arc<dyn PackageManager>) {
        self.managers.insert(manager.name().to_string(), manager);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn PackageManager>> {
        self.managers.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.managers.contains_key(name)
    }

    /// All registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.managers.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn PackageManager>)> {
        self.managers.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.managers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.managers.is_empty()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
