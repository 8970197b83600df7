// SPDX-License-Identifier: MIT

//! Tri-state reconciliation between configured and actual items

use crate::{ActualItem, ConfiguredItem, Domain, Item, ItemState};
use std::collections::{BTreeSet, HashMap};

/// Per-domain reconciliation result.
///
/// Every `(manager, name)` key from the inputs lands in exactly one of the
/// three buckets. Array order is insertion order from the input slices;
/// consumers sort if they need to.
#[derive(Debug, Clone, Default)]
pub struct Reconciliation {
    pub domain: Option<Domain>,
    pub managed: Vec<Item>,
    pub missing: Vec<Item>,
    pub untracked: Vec<Item>,
}

impl Reconciliation {
    pub fn new(domain: Domain) -> Self {
        Self {
            domain: Some(domain),
            ..Self::default()
        }
    }

    /// Count of degraded entries within `managed`.
    pub fn degraded_count(&self) -> usize {
        self.managed
            .iter()
            .filter(|i| i.state == ItemState::Degraded)
            .count()
    }

    /// True when nothing needs applying: no missing items, no drift.
    pub fn is_converged(&self) -> bool {
        self.missing.is_empty() && self.degraded_count() == 0
    }

    pub fn total(&self) -> usize {
        self.managed.len() + self.missing.len() + self.untracked.len()
    }

    /// Merge another reconciliation into this one, preserving order.
    pub fn merge(&mut self, other: Reconciliation) {
        if self.domain != other.domain {
            self.domain = None;
        }
        self.managed.extend(other.managed);
        self.missing.extend(other.missing);
        self.untracked.extend(other.untracked);
    }
}

fn key_of(manager: &str, name: &str) -> (String, String) {
    (manager.to_string(), name.to_string())
}

fn item_from_configured(c: &ConfiguredItem, domain: Domain, state: ItemState) -> Item {
    let mut metadata = c.metadata.clone();
    if let Some(v) = &c.version {
        metadata.entry("version".to_string()).or_insert_with(|| v.clone());
    }
    Item {
        name: c.name.clone(),
        domain,
        manager: c.manager.clone(),
        state,
        path: c.path.clone(),
        metadata,
    }
}

fn item_from_actual(a: &ActualItem, domain: Domain, state: ItemState) -> Item {
    let mut metadata = std::collections::BTreeMap::new();
    if let Some(v) = &a.version {
        metadata.insert("version".to_string(), v.clone());
    }
    Item {
        name: a.name.clone(),
        domain,
        manager: a.manager.clone(),
        state,
        path: a.path.clone(),
        metadata,
    }
}

/// Classify configured vs actual items into managed / missing / untracked.
///
/// Pure: the result depends only on the inputs. Items are keyed by
/// `(manager, name)` so identical names under different managers do not
/// collide.
pub fn reconcile(
    configured: &[ConfiguredItem],
    actual: &[ActualItem],
    domain: Domain,
) -> Reconciliation {
    let mut result = Reconciliation::new(domain);

    let actual_index: HashMap<(String, String), &ActualItem> = actual
        .iter()
        .map(|a| (key_of(&a.manager, &a.name), a))
        .collect();
    let configured_keys: BTreeSet<(String, String)> = configured
        .iter()
        .map(|c| key_of(&c.manager, &c.name))
        .collect();

    for c in configured {
        match actual_index.get(&key_of(&c.manager, &c.name)) {
            Some(a) => {
                let mut item = item_from_configured(c, domain, ItemState::Managed);
                // The observed version wins over the configured one.
                if let Some(v) = &a.version {
                    item.metadata.insert("version".to_string(), v.clone());
                }
                result.managed.push(item);
            }
            None => result
                .missing
                .push(item_from_configured(c, domain, ItemState::Missing)),
        }
    }

    for a in actual {
        if !configured_keys.contains(&key_of(&a.manager, &a.name)) {
            result
                .untracked
                .push(item_from_actual(a, domain, ItemState::Untracked));
        }
    }

    result
}

/// Reconcile dotfiles, re-labelling managed items whose deployed contents
/// drifted from their source as `Degraded`.
///
/// `drifted` holds the names of configured items whose destination bytes
/// differ from the managed source.
pub fn reconcile_dotfiles(
    configured: &[ConfiguredItem],
    actual: &[ActualItem],
    drifted: &BTreeSet<String>,
) -> Reconciliation {
    let mut result = reconcile(configured, actual, Domain::Dotfile);
    for item in &mut result.managed {
        if drifted.contains(&item.name) {
            item.state = ItemState::Degraded;
        }
    }
    result
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
