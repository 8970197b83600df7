// SPDX-License-Identifier: MIT

//! Item values produced and consumed by reconciliation

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// The kind of thing an item describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Package,
    Dotfile,
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Package => "package",
            Domain::Dotfile => "dotfile",
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reconciliation state of an item.
///
/// `Degraded` only applies to dotfiles: the destination exists but its
/// contents differ from the managed source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemState {
    Managed,
    Missing,
    Untracked,
    Degraded,
}

impl ItemState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemState::Managed => "managed",
            ItemState::Missing => "missing",
            ItemState::Untracked => "untracked",
            ItemState::Degraded => "degraded",
        }
    }
}

impl std::fmt::Display for ItemState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single reconciled item. Immutable once emitted by a reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub domain: Domain,
    /// Owning package manager; empty for dotfiles.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub manager: String,
    pub state: ItemState,
    /// Absolute destination path; dotfiles only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl Item {
    /// Reconciliation key: `(manager, name)` for packages, `name` for dotfiles.
    pub fn key(&self) -> (String, String) {
        (self.manager.clone(), self.name.clone())
    }
}

/// Intent: what should exist.
///
/// Packages carry a manager and optional version; dotfiles carry the
/// destination path and a `source` metadata entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfiguredItem {
    pub name: String,
    /// Empty for dotfiles.
    pub manager: String,
    pub version: Option<String>,
    /// Absolute destination path; dotfiles only.
    pub path: Option<PathBuf>,
    pub metadata: BTreeMap<String, String>,
}

impl ConfiguredItem {
    pub fn package(manager: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            manager: manager.into(),
            ..Self::default()
        }
    }

    pub fn dotfile(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Observation: what is present.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActualItem {
    pub name: String,
    /// Empty for dotfiles.
    pub manager: String,
    pub version: Option<String>,
    /// Absolute destination path; dotfiles only.
    pub path: Option<PathBuf>,
}

impl ActualItem {
    pub fn package(manager: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            manager: manager.into(),
            ..Self::default()
        }
    }

    pub fn dotfile(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

#[cfg(test)]
#[path = "item_tests.rs"]
mod tests;
