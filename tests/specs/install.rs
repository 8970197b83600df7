//! `rig install` / `rig uninstall` end-to-end behavior.

use crate::prelude::TestEnv;
use predicates::str as pstr;

#[test]
fn install_records_the_package_in_the_lock() {
    let env = TestEnv::new().with_pkgx();

    env.cmd()
        .args(["install", "pkgx:hello"])
        .assert()
        .success()
        .stdout(pstr::contains("installed"));
    assert_eq!(env.installed(), ["hello"]);

    let lock: serde_yaml::Value = serde_yaml::from_str(&env.read_lock()).unwrap();
    assert_eq!(lock["version"], 2);
    assert_eq!(lock["resources"][0]["id"], "pkgx:hello");
    assert_eq!(lock["resources"][0]["metadata"]["manager"], "pkgx");
}

#[test]
fn bare_name_uses_the_default_manager() {
    let env = TestEnv::new().with_pkgx();

    env.cmd().args(["install", "hello"]).assert().success();
    assert!(env.read_lock().contains("pkgx:hello"));
}

#[test]
fn unknown_manager_fails() {
    let env = TestEnv::new().with_pkgx();

    env.cmd()
        .args(["install", "ghost:tool"])
        .assert()
        .failure()
        .stdout(pstr::contains("unknown manager"));
    assert!(env.read_lock().is_empty());
}

#[test]
fn install_failure_does_not_touch_the_lock() {
    let env = TestEnv::new().with_pkgx();

    env.cmd()
        .args(["install", "pkgx:broken-package"])
        .assert()
        .failure();
    assert!(env.read_lock().is_empty());
    assert!(env.installed().is_empty());
}

#[test]
fn uninstall_by_bare_name_resolves_through_the_lock() {
    let env = TestEnv::new().with_pkgx();
    env.cmd().args(["install", "pkgx:hello"]).assert().success();

    env.cmd()
        .args(["uninstall", "hello"])
        .assert()
        .success()
        .stdout(pstr::contains("removed"));
    assert!(env.installed().is_empty());
    assert!(!env.read_lock().contains("pkgx:hello"));
}

#[test]
fn uninstall_of_unlocked_bare_name_suggests_a_prefix() {
    let env = TestEnv::new().with_pkgx();

    env.cmd()
        .args(["uninstall", "nothere"])
        .assert()
        .failure()
        .stdout(pstr::contains("not in the lock"));
}

#[test]
fn uninstall_with_prefix_of_absent_package_is_idempotent() {
    let env = TestEnv::new().with_pkgx();

    // The fake manager reports "is not installed", which the descriptor
    // declares as an idempotent error.
    env.cmd()
        .args(["uninstall", "pkgx:nothere"])
        .assert()
        .success();
}
