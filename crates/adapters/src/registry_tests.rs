// SPDX-License-Identifier: MIT

use super::*;
use crate::runner::FakeRunner;
use rig_core::{Config, ManagerSpec};
use std::sync::Arc;

fn builtins(config: &Config) -> Registry {
    Registry::with_builtins(Arc::new(FakeRunner::new()), config)
}

#[test]
fn builtins_are_registered() {
    let registry = builtins(&Config::default());
    for name in ["brew", "npm", "pnpm", "bun", "cargo", "go", "uv", "pipx", "gem", "composer", "conda", "apt", "pixi"] {
        assert!(registry.contains(name), "missing builtin {name}");
    }
}

#[test]
fn names_are_sorted() {
    let registry = builtins(&Config::default());
    let names = registry.names();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
}

#[test]
fn unrecognized_config_manager_becomes_generic() {
    let config = Config::parse(
        r#"
managers:
  nix:
    binary: nix-env
    install:
      command: ["-i", "{package}"]
"#,
    )
    .unwrap();
    let registry = builtins(&config);
    assert!(registry.contains("nix"));
    assert_eq!(registry.get("nix").unwrap().name(), "nix");
}

#[test]
fn config_descriptor_does_not_replace_builtin() {
    let mut config = Config::default();
    config.managers.insert(
        "brew".to_string(),
        ManagerSpec {
            binary: Some("not-brew".to_string()),
            ..ManagerSpec::default()
        },
    );
    let registry = builtins(&config);
    // The builtin adapter keeps its identity.
    assert_eq!(registry.get("brew").unwrap().install_hint(), "install Homebrew from https://brew.sh");
}

#[test]
fn get_unknown_manager_is_none() {
    let registry = builtins(&Config::default());
    assert!(registry.get("not-a-manager").is_none());
}

#[test]
fn insert_replaces_same_name() {
    let runner: Arc<dyn crate::runner::CommandRunner> = Arc::new(FakeRunner::new());
    let mut registry = Registry::new();
    assert!(registry.is_empty());
    registry.insert(Arc::new(crate::managers::GenericManager::new(
        "tool",
        ManagerSpec::default(),
        runner.clone(),
    )));
    registry.insert(Arc::new(crate::managers::GenericManager::new(
        "tool",
        ManagerSpec {
            install_hint: Some("second".to_string()),
            ..ManagerSpec::default()
        },
        runner,
    )));
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.get("tool").unwrap().install_hint(), "second");
}
