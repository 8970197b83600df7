// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn lines_takes_name_and_optional_version() {
    let parsed = lines("jq 1.7.1\ntree\n\n  wget 1.24.5  \n");
    assert_eq!(parsed.len(), 3);
    assert_eq!(parsed[0], InstalledPackage::with_version("jq", "1.7.1"));
    assert_eq!(parsed[1], InstalledPackage::new("tree"));
    assert_eq!(parsed[2], InstalledPackage::with_version("wget", "1.24.5"));
}

#[test]
fn json_array_reads_default_name_field() {
    let parsed = json_array(
        "conda",
        r#"[{"name": "numpy", "version": "1.26.4"}, {"name": "pip"}]"#,
        None,
    )
    .unwrap();
    assert_eq!(parsed[0], InstalledPackage::with_version("numpy", "1.26.4"));
    assert_eq!(parsed[1], InstalledPackage::new("pip"));
}

#[test]
fn json_array_honors_custom_name_field() {
    let parsed = json_array("x", r#"[{"id": "tool", "version": "2"}]"#, Some("id")).unwrap();
    assert_eq!(parsed[0].name, "tool");
}

#[test]
fn json_array_skips_entries_without_name() {
    let parsed = json_array("x", r#"[{"version": "2"}, {"name": "ok"}]"#, None).unwrap();
    assert_eq!(parsed.len(), 1);
}

#[test]
fn json_array_rejects_non_array() {
    let err = json_array("x", r#"{"name": "oops"}"#, None).unwrap_err();
    assert_eq!(err.kind(), "parse");
}

#[test]
fn json_map_with_string_values() {
    let parsed = json_map("x", r#"{"typescript": "5.5.2"}"#, None).unwrap();
    assert_eq!(
        parsed,
        vec![InstalledPackage::with_version("typescript", "5.5.2")]
    );
}

#[test]
fn json_map_with_nested_version_path() {
    let parsed = json_map(
        "pipx",
        r#"{"black": {"metadata": {"main_package": {"package_version": "24.4.2"}}}}"#,
        Some("metadata.main_package.package_version"),
    )
    .unwrap();
    assert_eq!(parsed[0], InstalledPackage::with_version("black", "24.4.2"));
}

#[test]
fn json_map_object_without_field_has_no_version() {
    let parsed = json_map("x", r#"{"tool": {"other": 1}}"#, Some("missing")).unwrap();
    assert_eq!(parsed[0].version, None);
}

#[test]
fn json_map_rejects_non_object() {
    let err = json_map("x", "[1, 2]", None).unwrap_err();
    assert_eq!(err.kind(), "parse");
}
