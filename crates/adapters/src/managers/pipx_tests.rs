// SPDX-License-Identifier: MIT

use super::*;
use crate::runner::FakeRunner;

fn manager(fake: &FakeRunner) -> PipxManager {
    PipxManager::new(Arc::new(fake.clone()))
}

#[tokio::test]
async fn list_reads_venvs_map() {
    let fake = FakeRunner::new().with_binary("pipx");
    fake.respond_ok(
        "pipx list --json",
        r#"{"venvs": {"black": {"metadata": {"main_package": {"package_version": "24.4.2"}}}}}"#,
    );
    let packages = manager(&fake).list_installed(&OpCtx::new()).await.unwrap();
    assert_eq!(packages, vec![InstalledPackage::with_version("black", "24.4.2")]);
}

#[tokio::test]
async fn empty_venvs_lists_nothing() {
    let fake = FakeRunner::new().with_binary("pipx");
    fake.respond_ok("pipx list --json", r#"{"venvs": {}}"#);
    let packages = manager(&fake).list_installed(&OpCtx::new()).await.unwrap();
    assert!(packages.is_empty());
}

#[tokio::test]
async fn install_already_installed_is_success() {
    let fake = FakeRunner::new().with_binary("pipx");
    fake.respond_fail("pipx install black", 1, "'black' already seems to be installed");
    manager(&fake).install(&OpCtx::new(), "black").await.unwrap();
}

#[tokio::test]
async fn uninstall_nothing_to_do_is_success() {
    let fake = FakeRunner::new().with_binary("pipx");
    fake.respond_fail("pipx uninstall gone", 1, "Nothing to uninstall for gone");
    manager(&fake).uninstall(&OpCtx::new(), "gone").await.unwrap();
}

#[tokio::test]
async fn upgrade_without_names_upgrades_all() {
    let fake = FakeRunner::new().with_binary("pipx");
    manager(&fake).upgrade(&OpCtx::new(), &[]).await.unwrap();
    assert_eq!(fake.calls(), ["pipx upgrade-all"]);
}
