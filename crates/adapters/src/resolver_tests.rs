// SPDX-License-Identifier: MIT

use super::*;
use crate::managers::GenericManager;
use crate::runner::FakeRunner;
use rig_core::ManagerSpec;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Registry of generic managers with the given dependency edges.
fn registry_with(edges: &[(&str, &[&str])]) -> Registry {
    let runner: Arc<dyn crate::runner::CommandRunner> = Arc::new(FakeRunner::new());
    let mut registry = Registry::new();
    for (name, deps) in edges {
        let spec = ManagerSpec {
            depends_on: deps.iter().map(|d| d.to_string()).collect(),
            ..ManagerSpec::default()
        };
        registry.insert(Arc::new(GenericManager::new(
            name.to_string(),
            spec,
            runner.clone(),
        )));
    }
    registry
}

fn set(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[test]
fn closure_of_npm_and_gem_includes_brew() {
    let registry = registry_with(&[("brew", &[]), ("npm", &["brew"]), ("gem", &["brew"])]);
    let closure = dependency_closure(&registry, &set(&["npm", "gem"]));
    assert_eq!(closure, set(&["brew", "gem", "npm"]));
}

#[test]
fn canonical_order_puts_brew_first() {
    let registry = registry_with(&[("brew", &[]), ("npm", &["brew"]), ("gem", &["brew"])]);
    let order = resolve_order(&registry, &set(&["npm", "gem"])).unwrap();
    assert_eq!(order, ["brew", "gem", "npm"]);
}

#[test]
fn independent_managers_sort_alphabetically() {
    let registry = registry_with(&[("zzz", &[]), ("aaa", &[]), ("mmm", &[])]);
    let order = resolve_order(&registry, &set(&["zzz", "mmm", "aaa"])).unwrap();
    assert_eq!(order, ["aaa", "mmm", "zzz"]);
}

#[test]
fn chains_resolve_depth_first() {
    let registry = registry_with(&[("a", &["b"]), ("b", &["c"]), ("c", &[])]);
    let order = resolve_order(&registry, &set(&["a"])).unwrap();
    assert_eq!(order, ["c", "b", "a"]);
}

#[test]
fn every_dependency_precedes_its_dependent() {
    let registry = registry_with(&[
        ("brew", &[]),
        ("npm", &["brew"]),
        ("gem", &["brew"]),
        ("pnpm", &["npm"]),
    ]);
    let order = resolve_order(&registry, &set(&["pnpm", "gem"])).unwrap();
    let pos = |n: &str| order.iter().position(|x| x == n).unwrap();
    assert!(pos("brew") < pos("npm"));
    assert!(pos("brew") < pos("gem"));
    assert!(pos("npm") < pos("pnpm"));
}

#[test]
fn cycle_is_detected_and_named() {
    let registry = registry_with(&[("a", &["b"]), ("b", &["a"])]);
    let err = resolve_order(&registry, &set(&["a"])).unwrap_err();
    match err {
        ResolveError::CycleDetected { nodes } => {
            assert_eq!(nodes, ["a", "b"]);
        }
    }
}

#[test]
fn self_cycle_is_detected() {
    let registry = registry_with(&[("a", &["a"])]);
    assert!(resolve_order(&registry, &set(&["a"])).is_err());
}

#[test]
fn unknown_dependency_has_no_edges() {
    let registry = registry_with(&[("npm", &["brew"])]);
    // brew is not registered; it still appears in the closure but
    // contributes no further edges.
    let order = resolve_order(&registry, &set(&["npm"])).unwrap();
    assert_eq!(order, ["brew", "npm"]);
}

#[test]
fn empty_set_resolves_to_empty_order() {
    let registry = registry_with(&[]);
    assert!(resolve_order(&registry, &BTreeSet::new()).unwrap().is_empty());
}
