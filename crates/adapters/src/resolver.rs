// SPDX-License-Identifier: MIT

//! Manager dependency resolution
//!
//! Managers declare which other managers must exist before they can
//! self-install (`npm` needs `brew`, and so on). The resolver computes the
//! transitive closure of those edges and a deterministic topological order
//! over it.

use crate::registry::Registry;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Errors from dependency resolution
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("dependency cycle detected among managers: {}", nodes.join(", "))]
    CycleDetected { nodes: Vec<String> },
}

/// Dependency edges for one manager; unknown names resolve to no edges so
/// a generic manager with a missing dependency degrades gracefully.
fn edges(registry: &Registry, name: &str) -> Vec<String> {
    registry
        .get(name)
        .map(|m| m.dependencies())
        .unwrap_or_default()
}

/// Transitive closure of `names` under manager dependencies.
pub fn dependency_closure(registry: &Registry, names: &BTreeSet<String>) -> BTreeSet<String> {
    let mut closure: BTreeSet<String> = names.clone();
    let mut frontier: Vec<String> = names.iter().cloned().collect();
    while let Some(name) = frontier.pop() {
        for dep in edges(registry, &name) {
            if closure.insert(dep.clone()) {
                frontier.push(dep);
            }
        }
    }
    closure
}

/// Topological order over the closure of `names`: dependencies precede
/// dependents, ties broken alphabetically.
pub fn resolve_order(
    registry: &Registry,
    names: &BTreeSet<String>,
) -> Result<Vec<String>, ResolveError> {
    let closure = dependency_closure(registry, names);

    // Kahn's algorithm with a sorted ready set for deterministic ties.
    let mut in_degree: BTreeMap<String, usize> =
        closure.iter().map(|n| (n.clone(), 0)).collect();
    let mut dependents: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for name in &closure {
        for dep in edges(registry, name) {
            if closure.contains(&dep) {
                *in_degree.entry(name.clone()).or_default() += 1;
                dependents.entry(dep).or_default().push(name.clone());
            }
        }
    }

    let mut ready: BTreeSet<String> = in_degree
        .iter()
        .filter(|(_, d)| **d == 0)
        .map(|(n, _)| n.clone())
        .collect();
    let mut order = Vec::with_capacity(closure.len());

    while let Some(next) = ready.iter().next().cloned() {
        ready.remove(&next);
        for dependent in dependents.get(&next).cloned().unwrap_or_default() {
            let degree = in_degree.entry(dependent.clone()).or_default();
            *degree -= 1;
            if *degree == 0 {
                ready.insert(dependent);
            }
        }
        order.push(next);
    }

    if order.len() != closure.len() {
        let mut remaining: Vec<String> = in_degree
            .into_iter()
            .filter(|(_, d)| *d > 0)
            .map(|(n, _)| n)
            .collect();
        remaining.sort();
        return Err(ResolveError::CycleDetected { nodes: remaining });
    }
    Ok(order)
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
