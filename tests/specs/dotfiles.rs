//! Dotfile deployment end-to-end behavior.

use crate::prelude::TestEnv;
use predicates::str as pstr;

#[test]
fn apply_deploys_missing_dotfiles() {
    let env = TestEnv::new().with_pkgx();
    env.write_dotfile("zshrc", "export EDITOR=vim\n");
    env.write_dotfile("config/nvim/init.lua", "vim.o.number = true\n");

    env.cmd()
        .args(["apply", "--dotfiles"])
        .assert()
        .success()
        .stdout(pstr::contains("2 deployed"));
    assert_eq!(env.read_home_file(".zshrc"), "export EDITOR=vim\n");
    assert_eq!(
        env.read_home_file(".config/nvim/init.lua"),
        "vim.o.number = true\n"
    );
}

#[test]
fn drifted_dotfile_is_restored_from_source() {
    let env = TestEnv::new().with_pkgx();
    env.write_dotfile("zshrc", "canonical\n");
    env.write_home_file(".zshrc", "edited by hand\n");

    env.cmd()
        .args(["apply", "--dotfiles"])
        .assert()
        .success()
        .stdout(pstr::contains("1 deployed"));
    similar_asserts::assert_eq!(env.read_home_file(".zshrc"), "canonical\n");

    // Converged afterwards.
    env.cmd()
        .args(["status", "--dotfiles", "--check"])
        .assert()
        .success();
}

#[test]
fn dry_run_leaves_the_home_directory_alone() {
    let env = TestEnv::new().with_pkgx();
    env.write_dotfile("zshrc", "x\n");

    env.cmd()
        .args(["apply", "--dotfiles", "--dry-run"])
        .assert()
        .success()
        .stdout(pstr::contains("1 would deploy"));
    assert!(!env.home().join(".zshrc").exists());
}

#[test]
fn ignored_files_never_deploy() {
    let env = TestEnv::new().with_pkgx();
    env.write_dotfile("zshrc", "x\n");
    env.write_dotfile(".DS_Store", "junk");

    env.cmd().args(["apply", "--dotfiles"]).assert().success();
    assert!(!env.home().join(".DS_Store").exists());
    assert!(env.home().join(".zshrc").exists());
}

#[test]
fn apply_without_scope_covers_both_domains() {
    let env = TestEnv::new().with_pkgx();
    env.write_dotfile("zshrc", "x\n");
    env.write_lock(
        "version: 2\nresources:\n- type: package\n  id: \"pkgx:hello\"\n",
    );

    env.cmd()
        .args(["apply"])
        .assert()
        .success()
        .stdout(pstr::contains("1 installed"))
        .stdout(pstr::contains("1 deployed"));
}
