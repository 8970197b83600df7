//! `rig status` end-to-end behavior.

use crate::prelude::TestEnv;
use predicates::str as pstr;

#[test]
fn status_classifies_all_three_states() {
    let env = TestEnv::new().with_pkgx();
    env.seed_installed("managed-one");
    env.seed_installed("stray");
    env.write_lock(
        "version: 2\nresources:\n- type: package\n  id: \"pkgx:managed-one\"\n- type: package\n  id: \"pkgx:missing-one\"\n",
    );

    env.cmd()
        .args(["status", "--packages"])
        .assert()
        .success()
        .stdout(pstr::contains("✓ pkgx:managed-one"))
        .stdout(pstr::contains("✗ pkgx:missing-one"))
        .stdout(pstr::contains("? pkgx:stray"))
        .stdout(pstr::contains("1 managed, 1 missing, 0 drifted, 1 untracked"));
}

#[test]
fn status_check_fails_when_missing() {
    let env = TestEnv::new().with_pkgx();
    env.write_lock(
        "version: 2\nresources:\n- type: package\n  id: \"pkgx:missing-one\"\n",
    );

    env.cmd()
        .args(["status", "--packages", "--check"])
        .assert()
        .failure();
}

#[test]
fn status_check_passes_when_converged() {
    let env = TestEnv::new().with_pkgx();
    env.seed_installed("hello");
    env.write_lock(
        "version: 2\nresources:\n- type: package\n  id: \"pkgx:hello\"\n",
    );

    env.cmd()
        .args(["status", "--packages", "--check"])
        .assert()
        .success();
}

#[test]
fn status_reports_drifted_dotfiles() {
    let env = TestEnv::new().with_pkgx();
    env.write_dotfile("zshrc", "canonical\n");
    env.write_home_file(".zshrc", "edited\n");

    env.cmd()
        .args(["status", "--dotfiles"])
        .assert()
        .success()
        .stdout(pstr::contains("~ .zshrc"))
        .stdout(pstr::contains("1 drifted"));
}

#[test]
fn status_json_lists_items_with_states() {
    let env = TestEnv::new().with_pkgx();
    env.write_lock(
        "version: 2\nresources:\n- type: package\n  id: \"pkgx:missing-one\"\n",
    );

    let output = env
        .cmd()
        .args(["status", "--packages", "-o", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value["missing"][0]["name"], "missing-one");
    assert_eq!(value["missing"][0]["state"], "missing");
    assert_eq!(value["missing"][0]["manager"], "pkgx");
}

#[test]
fn legacy_v1_lock_is_readable() {
    let env = TestEnv::new().with_pkgx();
    env.write_lock("version: 1\nresources:\n- type: package\n  id: \"pkgx:oldie\"\n");

    env.cmd()
        .args(["status", "--packages"])
        .assert()
        .success()
        .stdout(pstr::contains("✗ pkgx:oldie"));
}
