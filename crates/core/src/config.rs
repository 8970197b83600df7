// SPDX-License-Identifier: MIT

//! Configuration file loading (YAML)
//!
//! The config is read once per command invocation and held immutable for
//! that invocation. An absent file yields the defaults; a malformed file is
//! a fatal `ConfigError`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Placeholder substituted with the package name in descriptor commands.
pub const PACKAGE_PLACEHOLDER: &str = "{package}";

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// How a manager's list output is turned into package names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParseStrategy {
    /// One package per line; first whitespace-separated token is the name,
    /// second (if present) the version.
    #[default]
    Lines,
    /// JSON array of objects.
    Json,
    /// JSON object keyed by package name.
    JsonMap,
}

/// A list-command descriptor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListSpec {
    pub command: Vec<String>,
    #[serde(default)]
    pub parse: ParseStrategy,
    /// For `json`: the object field holding the name (default `name`).
    /// For `json-map`: the value field holding the version, if any.
    #[serde(default)]
    pub json_field: Option<String>,
}

/// A mutating-command descriptor (install / uninstall / upgrade).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandSpec {
    /// Argv after the binary; `{package}` is replaced per call.
    pub command: Vec<String>,
    /// Case-insensitive substrings of combined output that turn a non-zero
    /// exit into success.
    #[serde(default)]
    pub idempotent_errors: Vec<String>,
}

impl CommandSpec {
    /// Substitute the package placeholder. Arguments without the
    /// placeholder are passed through verbatim.
    pub fn render(&self, package: &str) -> Vec<String> {
        self.command
            .iter()
            .map(|a| a.replace(PACKAGE_PLACEHOLDER, package))
            .collect()
    }
}

/// Descriptor for a manager not built in; also used to override the
/// dependency edges of builtins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManagerSpec {
    /// Binary name; defaults to the manager name.
    #[serde(default)]
    pub binary: Option<String>,
    #[serde(default)]
    pub list: Option<ListSpec>,
    #[serde(default)]
    pub install: Option<CommandSpec>,
    #[serde(default)]
    pub uninstall: Option<CommandSpec>,
    #[serde(default)]
    pub upgrade: Option<CommandSpec>,
    /// Shown when the manager's binary is absent.
    #[serde(default)]
    pub install_hint: Option<String>,
    /// Managers that must be present before this one can self-install.
    #[serde(default)]
    pub depends_on: Vec<String>,
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct Config {
    pub default_manager: String,
    /// Whole-run budget, seconds.
    pub operation_timeout: u64,
    /// Per adapter call, seconds.
    pub package_timeout: u64,
    /// Per dotfile copy, seconds.
    pub dotfile_timeout: u64,
    /// Directories whose children are tracked individually rather than as
    /// one unit; literal names, matched at any depth.
    pub expand_directories: Vec<String>,
    /// Per-segment glob patterns excluded from the managed tree scan.
    pub ignore_patterns: Vec<String>,
    pub diff_tool: Option<String>,
    pub managers: IndexMap<String, ManagerSpec>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_manager: "brew".to_string(),
            operation_timeout: 300,
            package_timeout: 120,
            dotfile_timeout: 30,
            expand_directories: default_expand_directories(),
            ignore_patterns: default_ignore_patterns(),
            diff_tool: None,
            managers: IndexMap::new(),
        }
    }
}

fn default_expand_directories() -> Vec<String> {
    vec![".config".to_string(), ".ssh".to_string()]
}

fn default_ignore_patterns() -> Vec<String> {
    [
        ".DS_Store",
        ".git",
        ".cache",
        ".bash_history",
        ".zsh_history",
        ".lesshst",
        "*.swp",
        "*.tmp",
        "*.bak",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Config {
    /// Load from `path`; an absent file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(ConfigError::Io {
                    path: path.display().to_string(),
                    source: e,
                })
            }
        };
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_manager.is_empty() {
            return Err(ConfigError::Invalid("default_manager is empty".into()));
        }
        for (field, value) in [
            ("operation_timeout", self.operation_timeout),
            ("package_timeout", self.package_timeout),
            ("dotfile_timeout", self.dotfile_timeout),
        ] {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{field} must be non-zero")));
            }
        }
        for (name, spec) in &self.managers {
            if name.is_empty() {
                return Err(ConfigError::Invalid("manager with empty name".into()));
            }
            for (op, cmd) in [
                ("list", spec.list.as_ref().map(|l| &l.command)),
                ("install", spec.install.as_ref().map(|c| &c.command)),
                ("uninstall", spec.uninstall.as_ref().map(|c| &c.command)),
                ("upgrade", spec.upgrade.as_ref().map(|c| &c.command)),
            ] {
                if let Some(cmd) = cmd {
                    if cmd.is_empty() {
                        return Err(ConfigError::Invalid(format!(
                            "manager {name}: {op} command is empty"
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    pub fn operation_budget(&self) -> Duration {
        Duration::from_secs(self.operation_timeout)
    }

    pub fn package_budget(&self) -> Duration {
        Duration::from_secs(self.package_timeout)
    }

    pub fn dotfile_budget(&self) -> Duration {
        Duration::from_secs(self.dotfile_timeout)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
