// SPDX-License-Identifier: MIT

use super::*;
use crate::runner::FakeRunner;

fn npm(fake: &FakeRunner) -> NodeManager {
    NodeManager::npm(Arc::new(fake.clone()))
}

#[tokio::test]
async fn npm_list_parses_dependencies_object() {
    let fake = FakeRunner::new().with_binary("npm");
    fake.respond_ok(
        "npm ls -g --json --depth=0",
        r#"{"dependencies": {"typescript": {"version": "5.5.2"}, "@scope/tool": {"version": "1.0.0"}}}"#,
    );
    let packages = npm(&fake).list_installed(&OpCtx::new()).await.unwrap();
    let mut names: Vec<&str> = packages.iter().map(|p| p.name.as_str()).collect();
    names.sort();
    assert_eq!(names, ["@scope/tool", "typescript"]);
}

#[tokio::test]
async fn npm_list_tolerates_nonzero_exit_with_json() {
    let fake = FakeRunner::new().with_binary("npm");
    fake.respond(
        "npm ls -g --json --depth=0",
        crate::runner::FakeResponse {
            stdout: r#"{"dependencies": {"typescript": {"version": "5.5.2"}}}"#.into(),
            stderr: "npm error peer dep missing".into(),
            code: 1,
        },
    );
    let packages = npm(&fake).list_installed(&OpCtx::new()).await.unwrap();
    assert_eq!(packages.len(), 1);
}

#[tokio::test]
async fn scoped_name_is_preserved_verbatim() {
    let fake = FakeRunner::new().with_binary("npm");
    npm(&fake).install(&OpCtx::new(), "@scope/pkg").await.unwrap();
    assert_eq!(fake.calls(), ["npm install -g @scope/pkg"]);
}

#[test]
fn scoped_lock_identity_records_scope_metadata() {
    let fake = FakeRunner::new().with_binary("npm");
    let identity = npm(&fake).lock_identity("@scope/pkg");
    assert_eq!(identity.name, "@scope/pkg");
    assert_eq!(identity.metadata["scope"], "@scope");
    assert_eq!(identity.metadata["full_name"], "@scope/pkg");
}

#[test]
fn unscoped_lock_identity_has_no_metadata() {
    let fake = FakeRunner::new().with_binary("npm");
    let identity = npm(&fake).lock_identity("typescript");
    assert_eq!(identity.name, "typescript");
    assert!(identity.metadata.is_empty());
}

#[tokio::test]
async fn pnpm_uses_add_for_install() {
    let fake = FakeRunner::new().with_binary("pnpm");
    let manager = NodeManager::pnpm(Arc::new(fake.clone()));
    manager.install(&OpCtx::new(), "typescript").await.unwrap();
    assert_eq!(fake.calls(), ["pnpm add -g typescript"]);
}

#[tokio::test]
async fn bun_list_parses_name_at_version_lines() {
    let fake = FakeRunner::new().with_binary("bun");
    let manager = NodeManager::bun(Arc::new(fake.clone()));
    fake.respond_ok(
        "bun pm ls -g",
        "/home/u/.bun/install/global node_modules (2)\n├── typescript@5.5.2\n└── @scope/tool@1.0.0\n",
    );
    let packages = manager.list_installed(&OpCtx::new()).await.unwrap();
    assert!(packages.contains(&InstalledPackage::with_version("typescript", "5.5.2")));
    assert!(packages.contains(&InstalledPackage::with_version("@scope/tool", "1.0.0")));
}

#[tokio::test]
async fn uninstall_absent_package_succeeds() {
    let fake = FakeRunner::new().with_binary("npm");
    fake.respond_fail("npm uninstall -g gone", 1, "npm error gone is not installed");
    npm(&fake).uninstall(&OpCtx::new(), "gone").await.unwrap();
}

#[tokio::test]
async fn node_managers_depend_on_brew() {
    let fake = FakeRunner::new();
    assert_eq!(npm(&fake).dependencies(), ["brew"]);
    assert_eq!(
        NodeManager::bun(Arc::new(fake.clone())).dependencies(),
        ["brew"]
    );
}

#[tokio::test]
async fn provider_names_differ() {
    let fake = FakeRunner::new();
    assert_eq!(npm(&fake).name(), "npm");
    assert_eq!(NodeManager::pnpm(Arc::new(fake.clone())).name(), "pnpm");
    assert_eq!(NodeManager::bun(Arc::new(fake.clone())).name(), "bun");
}
