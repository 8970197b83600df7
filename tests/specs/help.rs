//! CLI surface checks.

use crate::prelude::TestEnv;
use predicates::str as pstr;

#[test]
fn help_lists_the_subcommands() {
    let env = TestEnv::new();
    env.cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(pstr::contains("apply"))
        .stdout(pstr::contains("status"))
        .stdout(pstr::contains("install"))
        .stdout(pstr::contains("managers"));
}

#[test]
fn unknown_subcommand_exits_with_usage_error() {
    let env = TestEnv::new();
    env.cmd().arg("frobnicate").assert().code(2);
}

#[test]
fn conflicting_scope_flags_are_rejected() {
    let env = TestEnv::new();
    env.cmd()
        .args(["apply", "--packages", "--dotfiles"])
        .assert()
        .code(2);
}

#[test]
fn managers_lists_the_fake_manager() {
    let env = TestEnv::new().with_pkgx();
    env.cmd()
        .arg("managers")
        .assert()
        .success()
        .stdout(pstr::contains("pkgx"));
}

#[test]
fn managers_shows_hints_for_unavailable_ones() {
    let env = TestEnv::new(); // no pkgx script on PATH
    env.cmd()
        .arg("managers")
        .assert()
        .success()
        .stdout(pstr::contains("install pkgx first"));
}
