// SPDX-License-Identifier: MIT

use super::*;
use crate::runner::FakeRunner;
use rig_core::{CommandSpec, ListSpec};

fn spec_with_all_ops() -> ManagerSpec {
    ManagerSpec {
        binary: Some("nix-env".to_string()),
        list: Some(ListSpec {
            command: vec!["-q".into()],
            parse: ParseStrategy::Lines,
            json_field: None,
        }),
        install: Some(CommandSpec {
            command: vec!["-i".into(), "{package}".into()],
            idempotent_errors: vec!["already installed".into()],
        }),
        uninstall: Some(CommandSpec {
            command: vec!["-e".into(), "{package}".into()],
            idempotent_errors: vec!["not installed".into()],
        }),
        upgrade: Some(CommandSpec {
            command: vec!["-u".into(), "{package}".into()],
            idempotent_errors: vec![],
        }),
        install_hint: Some("install nix".to_string()),
        depends_on: vec!["brew".to_string()],
    }
}

fn manager(fake: &FakeRunner, spec: ManagerSpec) -> GenericManager {
    GenericManager::new("nix", spec, Arc::new(fake.clone()))
}

#[tokio::test]
async fn descriptor_binary_overrides_name() {
    let fake = FakeRunner::new().with_binary("nix-env");
    let m = manager(&fake, spec_with_all_ops());
    assert!(m.is_available(&OpCtx::new()).await.unwrap());
    assert_eq!(m.name(), "nix");
}

#[tokio::test]
async fn list_uses_configured_parse_strategy() {
    let fake = FakeRunner::new().with_binary("nix-env");
    fake.respond_ok("nix-env -q", "hello-2.12.1\nripgrep-14.1.0\n");
    let packages = manager(&fake, spec_with_all_ops())
        .list_installed(&OpCtx::new())
        .await
        .unwrap();
    assert_eq!(packages.len(), 2);
}

#[tokio::test]
async fn install_renders_package_placeholder() {
    let fake = FakeRunner::new().with_binary("nix-env");
    manager(&fake, spec_with_all_ops())
        .install(&OpCtx::new(), "hello")
        .await
        .unwrap();
    assert_eq!(fake.calls(), ["nix-env -i hello"]);
}

#[tokio::test]
async fn descriptor_idempotent_errors_apply() {
    let fake = FakeRunner::new().with_binary("nix-env");
    fake.respond_fail("nix-env -i hello", 1, "warning: hello already installed");
    manager(&fake, spec_with_all_ops())
        .install(&OpCtx::new(), "hello")
        .await
        .unwrap();
}

#[tokio::test]
async fn missing_operation_is_unsupported() {
    let fake = FakeRunner::new().with_binary("tool");
    let m = GenericManager::new("tool", ManagerSpec::default(), Arc::new(fake.clone()));
    let err = m.list_installed(&OpCtx::new()).await.unwrap_err();
    assert_eq!(err.kind(), "unsupported");
    let err = m.install(&OpCtx::new(), "x").await.unwrap_err();
    assert_eq!(err.kind(), "unsupported");
}

#[tokio::test]
async fn dependencies_come_from_descriptor() {
    let fake = FakeRunner::new();
    assert_eq!(manager(&fake, spec_with_all_ops()).dependencies(), ["brew"]);
}

#[tokio::test]
async fn hint_falls_back_to_binary_name() {
    let fake = FakeRunner::new();
    let m = GenericManager::new("tool", ManagerSpec::default(), Arc::new(fake.clone()));
    assert!(m.install_hint().contains("tool"));
}

#[tokio::test]
async fn json_map_list_strategy() {
    let fake = FakeRunner::new().with_binary("tool");
    let spec = ManagerSpec {
        list: Some(ListSpec {
            command: vec!["ls".into(), "--json".into()],
            parse: ParseStrategy::JsonMap,
            json_field: None,
        }),
        ..ManagerSpec::default()
    };
    fake.respond_ok("tool ls --json", r#"{"pkg": "1.0.0"}"#);
    let packages = GenericManager::new("tool", spec, Arc::new(fake.clone()))
        .list_installed(&OpCtx::new())
        .await
        .unwrap();
    assert_eq!(packages, vec![InstalledPackage::with_version("pkg", "1.0.0")]);
}
