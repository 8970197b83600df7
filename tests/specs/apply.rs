//! `rig apply` end-to-end behavior.

use crate::prelude::TestEnv;
use predicates::str as pstr;

#[test]
fn apply_installs_missing_locked_packages() {
    let env = TestEnv::new().with_pkgx();
    env.write_lock(
        "version: 2\nresources:\n- type: package\n  id: \"pkgx:hello\"\n  metadata:\n    manager: pkgx\n    name: hello\n",
    );

    env.cmd()
        .args(["apply", "--packages"])
        .assert()
        .success()
        .stdout(pstr::contains("pkgx:hello: installed"));
    assert_eq!(env.installed(), ["hello"]);
}

#[test]
fn second_apply_reports_unchanged() {
    let env = TestEnv::new().with_pkgx();
    env.write_lock(
        "version: 2\nresources:\n- type: package\n  id: \"pkgx:hello\"\n",
    );
    env.cmd().args(["apply", "--packages"]).assert().success();

    env.cmd()
        .args(["apply", "--packages"])
        .assert()
        .success()
        .stdout(pstr::contains("1 unchanged"));
    // Still exactly one installation.
    assert_eq!(env.installed(), ["hello"]);
}

#[test]
fn dry_run_changes_nothing() {
    let env = TestEnv::new().with_pkgx();
    env.write_lock(
        "version: 2\nresources:\n- type: package\n  id: \"pkgx:hello\"\n",
    );

    env.cmd()
        .args(["apply", "--packages", "--dry-run"])
        .assert()
        .success()
        .stdout(pstr::contains("would-install"));
    assert!(env.installed().is_empty());
}

#[test]
fn partial_failure_continues_and_exits_nonzero() {
    let env = TestEnv::new().with_pkgx();
    env.write_lock(
        "version: 2\nresources:\n- type: package\n  id: \"pkgx:good-one\"\n- type: package\n  id: \"pkgx:broken-package\"\n- type: package\n  id: \"pkgx:good-two\"\n",
    );

    env.cmd()
        .args(["apply", "--packages"])
        .assert()
        .failure()
        .stdout(pstr::contains("failed"));
    let mut installed = env.installed();
    installed.sort();
    assert_eq!(installed, ["good-one", "good-two"]);
    // The failed entry stays in the lock for the next run.
    assert!(env.read_lock().contains("broken-package"));
}

#[test]
fn untracked_packages_are_reported_not_removed() {
    let env = TestEnv::new().with_pkgx();
    env.seed_installed("stray");

    env.cmd()
        .args(["apply", "--packages"])
        .assert()
        .success()
        .stdout(pstr::contains("1 untracked"));
    assert_eq!(env.installed(), ["stray"]);
}

#[test]
fn managed_package_is_left_alone() {
    let env = TestEnv::new().with_pkgx();
    env.seed_installed("hello");
    env.write_lock(
        "version: 2\nresources:\n- type: package\n  id: \"pkgx:hello\"\n",
    );

    env.cmd()
        .args(["apply", "--packages"])
        .assert()
        .success()
        .stdout(pstr::contains("1 unchanged"));
    assert_eq!(env.installed(), ["hello"]);
}

#[test]
fn json_summary_is_machine_readable() {
    let env = TestEnv::new().with_pkgx();
    env.write_lock(
        "version: 2\nresources:\n- type: package\n  id: \"pkgx:hello\"\n",
    );

    let output = env
        .cmd()
        .args(["apply", "--packages", "-o", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value["totals"]["installed"], 1);
    assert_eq!(value["dry_run"], false);
    assert_eq!(value["results"][0]["name"], "hello");
}
