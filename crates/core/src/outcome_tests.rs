// SPDX-License-Identifier: MIT

use super::*;
use yare::parameterized;

#[parameterized(
    unchanged = { ItemStatus::Unchanged, "unchanged" },
    installed = { ItemStatus::Installed, "installed" },
    would_install = { ItemStatus::WouldInstall, "would-install" },
    lock_failed = { ItemStatus::InstalledLockFailed, "installed-but-lock-failed" },
    canceled = { ItemStatus::Canceled, "canceled" },
)]
fn status_strings(status: ItemStatus, expected: &str) {
    assert_eq!(status.as_str(), expected);
}

#[test]
fn only_failed_and_canceled_count_as_failures() {
    assert!(ItemStatus::Failed.is_failure());
    assert!(ItemStatus::Canceled.is_failure());
    assert!(!ItemStatus::InstalledLockFailed.is_failure());
    assert!(!ItemStatus::Reported.is_failure());
    assert!(!ItemStatus::WouldInstall.is_failure());
}

fn summary_with(statuses: &[(&str, &str, ItemStatus)]) -> ApplySummary {
    let mut summary = ApplySummary::default();
    for (manager, name, status) in statuses {
        summary.push(
            OperationResult::ok(*name, Domain::Package, *status).with_manager(*manager),
        );
    }
    summary
}

#[test]
fn totals_count_by_status() {
    let summary = summary_with(&[
        ("brew", "jq", ItemStatus::Installed),
        ("brew", "tree", ItemStatus::Installed),
        ("brew", "nope", ItemStatus::Failed),
        ("npm", "typescript", ItemStatus::WouldInstall),
        ("brew", "wget", ItemStatus::Reported),
    ]);
    let t = summary.totals();
    assert_eq!(t.installed, 2);
    assert_eq!(t.failed, 1);
    assert_eq!(t.would_install, 1);
    assert_eq!(t.reported, 1);
    assert_eq!(t.missing, 4);
}

#[test]
fn lock_failed_counts_as_installed() {
    let summary = summary_with(&[("brew", "jq", ItemStatus::InstalledLockFailed)]);
    assert_eq!(summary.totals().installed, 1);
    assert!(summary.success());
}

#[test]
fn per_manager_breakdown_groups_package_results() {
    let summary = summary_with(&[
        ("brew", "jq", ItemStatus::Installed),
        ("brew", "nope", ItemStatus::Failed),
        ("npm", "typescript", ItemStatus::Installed),
    ]);
    let by_manager = summary.per_manager();
    assert_eq!(by_manager["brew"].installed, 1);
    assert_eq!(by_manager["brew"].failed, 1);
    assert_eq!(by_manager["npm"].installed, 1);
    assert!(!by_manager.contains_key("cargo"));
}

#[test]
fn dotfile_results_do_not_appear_in_manager_breakdown() {
    let mut summary = ApplySummary::default();
    summary.push(OperationResult::ok(".zshrc", Domain::Dotfile, ItemStatus::Deployed));
    assert!(summary.per_manager().is_empty());
    assert_eq!(summary.totals().deployed, 1);
}

#[test]
fn success_is_false_with_any_failure() {
    let summary = summary_with(&[
        ("brew", "jq", ItemStatus::Installed),
        ("brew", "nope", ItemStatus::Failed),
    ]);
    assert!(!summary.success());
}

#[test]
fn failed_result_carries_kind_and_suggestion() {
    let r = OperationResult::failed("cargo:ripgrep", Domain::Package, "manager-unavailable", "cargo is not available")
        .with_suggestion("install rust via https://rustup.rs");
    assert_eq!(r.status, ItemStatus::Failed);
    assert_eq!(r.error_kind.as_deref(), Some("manager-unavailable"));
    assert!(r.suggestion.as_deref().unwrap().contains("rustup"));
}
