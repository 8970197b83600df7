// SPDX-License-Identifier: MIT

//! Lock file persistence
//!
//! The lock is the authoritative list of managed package resources,
//! serialized as YAML. Writes are atomic (temp file + rename) so a crash
//! mid-write never corrupts the previous state. This store is the file's
//! exclusive owner; concurrent writers from separate processes are
//! unsupported.

use rig_core::Domain;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Current lock format version. Older versions are read-upgradable and are
/// rewritten at this version on the next write.
pub const LOCK_VERSION: u32 = 2;

/// Errors that can occur in lock operations
#[derive(Debug, Error)]
pub enum LockError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// One managed resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceEntry {
    #[serde(rename = "type")]
    pub kind: String,
    /// `"{manager}:{name}"` for packages.
    pub id: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl ResourceEntry {
    pub fn package(
        manager: &str,
        name: &str,
        version: Option<&str>,
        extra: BTreeMap<String, String>,
    ) -> Self {
        let mut metadata = extra;
        metadata.insert("manager".to_string(), manager.to_string());
        metadata.insert("name".to_string(), name.to_string());
        if let Some(version) = version {
            metadata.insert("version".to_string(), version.to_string());
        }
        Self {
            kind: Domain::Package.as_str().to_string(),
            id: format!("{manager}:{name}"),
            metadata,
        }
    }

    /// Manager, from metadata or recovered from the id prefix (v1 locks
    /// carry thin metadata).
    pub fn manager(&self) -> &str {
        self.metadata
            .get("manager")
            .map(String::as_str)
            .or_else(|| self.id.split_once(':').map(|(manager, _)| manager))
            .unwrap_or_default()
    }

    /// Package name, from metadata or the id suffix.
    pub fn name(&self) -> &str {
        self.metadata
            .get("name")
            .map(String::as_str)
            .or_else(|| self.id.split_once(':').map(|(_, name)| name))
            .unwrap_or(&self.id)
    }

    pub fn version(&self) -> Option<&str> {
        self.metadata.get("version").map(String::as_str)
    }
}

/// The serialized lock document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lock {
    pub version: u32,
    #[serde(default)]
    pub resources: Vec<ResourceEntry>,
}

impl Default for Lock {
    fn default() -> Self {
        Self {
            version: LOCK_VERSION,
            resources: Vec::new(),
        }
    }
}

impl Lock {
    /// Entries recorded for one manager.
    pub fn packages_for(&self, manager: &str) -> Vec<&ResourceEntry> {
        self.resources
            .iter()
            .filter(|e| e.manager() == manager)
            .collect()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.resources.iter().position(|e| e.id == id)
    }
}

/// Reads and writes the lock file.
pub struct LockStore {
    path: PathBuf,
}

impl LockStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the lock; an absent file is an empty lock, not an error.
    pub fn read(&self) -> Result<Lock, LockError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Lock::default());
            }
            Err(e) => return Err(e.into()),
        };
        let lock: Lock = serde_yaml::from_str(&text)?;
        if lock.version < LOCK_VERSION {
            tracing::debug!(
                version = lock.version,
                "read legacy lock; next write upgrades it"
            );
        }
        Ok(lock)
    }

    /// Write atomically: serialize to a temp file in the same directory,
    /// sync, then rename over the target. Always emits the current version.
    pub fn write(&self, lock: &Lock) -> Result<(), LockError> {
        let mut upgraded;
        let lock = if lock.version == LOCK_VERSION {
            lock
        } else {
            upgraded = lock.clone();
            upgraded.version = LOCK_VERSION;
            &upgraded
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp_path = self.path.with_extension("lock.tmp");
        {
            let file = File::create(&tmp_path)?;
            let mut writer = BufWriter::new(file);
            let text = serde_yaml::to_string(lock)?;
            writer.write_all(text.as_bytes())?;
            let file = writer.into_inner().map_err(|e| e.into_error())?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Upsert one package entry. Metadata merges onto an existing entry;
    /// the id and version are replaced.
    pub fn add_package(
        &self,
        manager: &str,
        name: &str,
        version: Option<&str>,
        metadata: BTreeMap<String, String>,
    ) -> Result<(), LockError> {
        let mut lock = self.read()?;
        let entry = ResourceEntry::package(manager, name, version, metadata);
        match lock.position(&entry.id) {
            Some(i) => {
                let existing = &mut lock.resources[i];
                for (key, value) in entry.metadata {
                    existing.metadata.insert(key, value);
                }
            }
            None => lock.resources.push(entry),
        }
        self.write(&lock)
    }

    /// Remove one package entry; absence is not an error.
    pub fn remove_package(&self, manager: &str, name: &str) -> Result<(), LockError> {
        let mut lock = self.read()?;
        let id = format!("{manager}:{name}");
        let before = lock.resources.len();
        lock.resources.retain(|e| e.id != id);
        if lock.resources.len() == before {
            return Ok(());
        }
        self.write(&lock)
    }

    pub fn has_package(&self, manager: &str, name: &str) -> Result<bool, LockError> {
        let lock = self.read()?;
        let id = format!("{manager}:{name}");
        Ok(lock.resources.iter().any(|e| e.id == id))
    }

    /// Every entry recording `name`, across managers. Used by uninstall
    /// when the user omits the manager prefix.
    pub fn find_package(&self, name: &str) -> Result<Vec<ResourceEntry>, LockError> {
        let lock = self.read()?;
        Ok(lock
            .resources
            .into_iter()
            .filter(|e| e.name() == name)
            .collect())
    }
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
