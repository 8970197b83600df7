// SPDX-License-Identifier: MIT

//! Managed dotfile tree scanning and deployment
//!
//! The source tree mirrors the home directory without leading dots:
//! `zshrc` deploys to `~/.zshrc`, `config/nvim/init.lua` to
//! `~/.config/nvim/init.lua`. Directories named in `expand_directories`
//! have their contents tracked as individual items; any other directory is
//! tracked as one opaque unit.

use rig_core::{ActualItem, ConfiguredItem};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Errors from dotfile scanning and deployment
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid ignore pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
    #[error("dotfile has no source metadata: {0}")]
    NoSource(String),
}

fn io_err(path: &Path, source: std::io::Error) -> ScanError {
    ScanError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Scans the managed tree and deploys files into the target root.
pub struct DotfileScanner {
    source_root: PathBuf,
    target_root: PathBuf,
    ignore: Vec<glob::Pattern>,
    expand: BTreeSet<String>,
}

impl DotfileScanner {
    pub fn new(
        source_root: impl Into<PathBuf>,
        target_root: impl Into<PathBuf>,
        ignore_patterns: &[String],
        expand_directories: &[String],
    ) -> Result<Self, ScanError> {
        let ignore = ignore_patterns
            .iter()
            .map(|p| {
                glob::Pattern::new(p).map_err(|source| ScanError::Pattern {
                    pattern: p.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let expand = expand_directories
            .iter()
            .map(|d| d.trim_start_matches('.').to_string())
            .collect();
        Ok(Self {
            source_root: source_root.into(),
            target_root: target_root.into(),
            ignore,
            expand,
        })
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn target_root(&self) -> &Path {
        &self.target_root
    }

    fn is_ignored(&self, segment: &str) -> bool {
        self.ignore.iter().any(|p| p.matches(segment))
    }

    fn is_expanded(&self, segment: &str) -> bool {
        self.expand.contains(segment.trim_start_matches('.'))
    }

    /// Map a source-relative path to its dotted home-relative form:
    /// the first segment gains a leading dot unless it already has one.
    fn dotted(rel: &Path) -> String {
        let mut segments = rel.components().map(|c| c.as_os_str().to_string_lossy());
        let mut out = String::new();
        if let Some(first) = segments.next() {
            if !first.starts_with('.') {
                out.push('.');
            }
            out.push_str(&first);
        }
        for segment in segments {
            out.push('/');
            out.push_str(&segment);
        }
        out
    }

    fn item_for(&self, rel: &Path) -> ConfiguredItem {
        let dotted = Self::dotted(rel);
        ConfiguredItem::dotfile(&dotted, self.target_root.join(&dotted))
            .with_metadata("source", rel.to_string_lossy())
    }

    /// One configured item per tracked file (plus one per unexpanded
    /// directory, covering its whole subtree).
    pub fn configured(&self) -> Result<Vec<ConfiguredItem>, ScanError> {
        let mut items = Vec::new();
        if !self.source_root.exists() {
            return Ok(items);
        }
        let mut walker = WalkDir::new(&self.source_root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter();
        while let Some(entry) = walker.next() {
            let entry = entry.map_err(|e| ScanError::Io {
                path: self.source_root.display().to_string(),
                source: e.into(),
            })?;
            let segment = entry.file_name().to_string_lossy().into_owned();
            if self.is_ignored(&segment) {
                if entry.file_type().is_dir() {
                    walker.skip_current_dir();
                }
                continue;
            }
            let Ok(rel) = entry.path().strip_prefix(&self.source_root) else {
                continue;
            };
            if entry.file_type().is_dir() {
                if !self.is_expanded(&segment) {
                    items.push(self.item_for(rel));
                    walker.skip_current_dir();
                }
                continue;
            }
            if entry.file_type().is_file() {
                items.push(self.item_for(rel));
            }
        }
        Ok(items)
    }

    /// The configured destinations that exist on disk.
    pub fn actual(&self, configured: &[ConfiguredItem]) -> Vec<ActualItem> {
        configured
            .iter()
            .filter_map(|item| {
                let path = item.path.as_ref()?;
                path.exists()
                    .then(|| ActualItem::dotfile(&item.name, path.clone()))
            })
            .collect()
    }

    fn source_of(&self, item: &ConfiguredItem) -> Result<PathBuf, ScanError> {
        item.metadata
            .get("source")
            .map(|s| self.source_root.join(s))
            .ok_or_else(|| ScanError::NoSource(item.name.clone()))
    }

    /// Names of configured items whose deployed bytes differ from their
    /// source. Items missing on disk are not drifted, they are missing.
    pub fn drifted(&self, configured: &[ConfiguredItem]) -> BTreeSet<String> {
        let mut drifted = BTreeSet::new();
        for item in configured {
            let (Some(dest), Ok(source)) = (item.path.as_ref(), self.source_of(item)) else {
                continue;
            };
            if !dest.exists() {
                continue;
            }
            if tree_differs(&source, dest) {
                drifted.insert(item.name.clone());
            }
        }
        drifted
    }

    /// Copy one item's source to its destination: parent directories at
    /// mode 0750, file mode preserved from the source (0644 fallback),
    /// atomically via temp + rename. Directory items deploy every file in
    /// their subtree.
    pub fn deploy(&self, item: &ConfiguredItem) -> Result<(), ScanError> {
        let source = self.source_of(item)?;
        let dest = item
            .path
            .clone()
            .ok_or_else(|| ScanError::NoSource(item.name.clone()))?;
        if source.is_dir() {
            for entry in WalkDir::new(&source).min_depth(1).sort_by_file_name() {
                let entry = entry.map_err(|e| ScanError::Io {
                    path: source.display().to_string(),
                    source: e.into(),
                })?;
                if !entry.file_type().is_file() {
                    continue;
                }
                let Ok(rel) = entry.path().strip_prefix(&source) else {
                    continue;
                };
                copy_atomic(entry.path(), &dest.join(rel))?;
            }
            Ok(())
        } else {
            copy_atomic(&source, &dest)
        }
    }
}

/// Byte comparison between a source file (or tree) and its destination.
/// A destination missing any source file, or differing in any byte, drifts.
fn tree_differs(source: &Path, dest: &Path) -> bool {
    if source.is_dir() {
        for entry in WalkDir::new(source).min_depth(1).sort_by_file_name() {
            let Ok(entry) = entry else { return true };
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(rel) = entry.path().strip_prefix(source) else {
                return true;
            };
            if file_differs(entry.path(), &dest.join(rel)) {
                return true;
            }
        }
        false
    } else {
        file_differs(source, dest)
    }
}

fn file_differs(source: &Path, dest: &Path) -> bool {
    match (fs::read(source), fs::read(dest)) {
        (Ok(a), Ok(b)) => a != b,
        _ => true,
    }
}

fn copy_atomic(source: &Path, dest: &Path) -> Result<(), ScanError> {
    if let Some(parent) = dest.parent() {
        create_dirs(parent)?;
    }
    let bytes = fs::read(source).map_err(|e| io_err(source, e))?;
    let mut tmp_name = dest.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    tmp_name.push(".tmp");
    let tmp = dest.with_file_name(tmp_name);
    fs::write(&tmp, &bytes).map_err(|e| io_err(&tmp, e))?;
    set_file_mode(source, &tmp)?;
    fs::rename(&tmp, dest).map_err(|e| io_err(dest, e))?;
    Ok(())
}

#[cfg(unix)]
fn create_dirs(parent: &Path) -> Result<(), ScanError> {
    use std::os::unix::fs::DirBuilderExt;
    if parent.exists() {
        return Ok(());
    }
    fs::DirBuilder::new()
        .recursive(true)
        .mode(0o750)
        .create(parent)
        .map_err(|e| io_err(parent, e))
}

#[cfg(not(unix))]
fn create_dirs(parent: &Path) -> Result<(), ScanError> {
    fs::create_dir_all(parent).map_err(|e| io_err(parent, e))
}

#[cfg(unix)]
fn set_file_mode(source: &Path, tmp: &Path) -> Result<(), ScanError> {
    use std::os::unix::fs::PermissionsExt;
    let mode = fs::metadata(source)
        .map(|m| m.permissions().mode() & 0o777)
        .unwrap_or(0o644);
    fs::set_permissions(tmp, fs::Permissions::from_mode(mode)).map_err(|e| io_err(tmp, e))
}

#[cfg(not(unix))]
fn set_file_mode(_source: &Path, _tmp: &Path) -> Result<(), ScanError> {
    Ok(())
}

#[cfg(test)]
#[path = "dotfiles_tests.rs"]
mod tests;
