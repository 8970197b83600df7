// SPDX-License-Identifier: MIT

//! Output-parsing helpers shared by adapters

use super::{InstalledPackage, PackageError};

/// One package per line; first whitespace token is the name, second (if
/// present) the version. Blank lines are skipped.
pub(crate) fn lines(text: &str) -> Vec<InstalledPackage> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|line| {
            let mut parts = line.split_whitespace();
            let name = parts.next().unwrap_or_default().to_string();
            InstalledPackage {
                name,
                version: parts.next().map(str::to_string),
            }
        })
        .filter(|p| !p.name.is_empty())
        .collect()
}

/// JSON array of objects: `[{"name": "...", "version": "..."}, ...]`.
/// `name_field` defaults to `name`; the version field is always `version`.
pub(crate) fn json_array(
    manager: &str,
    text: &str,
    name_field: Option<&str>,
) -> Result<Vec<InstalledPackage>, PackageError> {
    let name_field = name_field.unwrap_or("name");
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| PackageError::parse(manager, e.to_string()))?;
    let array = value
        .as_array()
        .ok_or_else(|| PackageError::parse(manager, "expected a JSON array"))?;
    let mut packages = Vec::with_capacity(array.len());
    for entry in array {
        let Some(name) = entry.get(name_field).and_then(|v| v.as_str()) else {
            continue;
        };
        packages.push(InstalledPackage {
            name: name.to_string(),
            version: entry
                .get("version")
                .and_then(|v| v.as_str())
                .map(str::to_string),
        });
    }
    Ok(packages)
}

/// JSON object keyed by package name. When `version_field` is given and the
/// value is an object, the version is read from that field; a plain string
/// value is itself the version.
pub(crate) fn json_map(
    manager: &str,
    text: &str,
    version_field: Option<&str>,
) -> Result<Vec<InstalledPackage>, PackageError> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| PackageError::parse(manager, e.to_string()))?;
    let map = value
        .as_object()
        .ok_or_else(|| PackageError::parse(manager, "expected a JSON object"))?;
    let mut packages = Vec::with_capacity(map.len());
    for (name, entry) in map {
        let version = match entry {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => version_field
                .and_then(|f| lookup_path(entry, f))
                .and_then(|v| v.as_str().map(str::to_string)),
            _ => None,
        };
        packages.push(InstalledPackage {
            name: name.clone(),
            version,
        });
    }
    Ok(packages)
}

/// Dotted-path lookup into nested JSON objects (`a.b.c`).
fn lookup_path<'a>(value: &'a serde_json::Value, path: &str) -> Option<&'a serde_json::Value> {
    let mut current = value;
    for segment in path.split('.') {
        current = current.get(segment)?;
    }
    Some(current)
}

#[cfg(test)]
#[path = "parse_tests.rs"]
mod tests;
