//! E2E tests for the `validate` command.

mod common;

use assert_cmd::cargo::cargo_bin_cmd;
use common::{descriptors, write_package};
use predicates::prelude::*;
use tempfile::TempDir;

#[test]
fn validate_succeeds_on_well_formed_tree() {
    let temp = TempDir::new().unwrap();
    write_package(temp.path(), "Project", descriptors::PROJECT);
    write_package(temp.path(), "FileBase", descriptors::FILE_BASE);

    let mut cmd = cargo_bin_cmd!("template-query");
    cmd.current_dir(temp.path())
        .args(["--color", "never", "validate"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("[OK]").count(2))
        .stdout(predicate::str::contains("2 descriptor(s) validated"));
}

#[test]
fn validate_fails_when_a_descriptor_is_malformed() {
    let temp = TempDir::new().unwrap();
    write_package(temp.path(), "Good", descriptors::PROJECT);
    write_package(temp.path(), "Bad", descriptors::MISSING_KIND);

    let mut cmd = cargo_bin_cmd!("template-query");
    cmd.current_dir(temp.path())
        .args(["--color", "never", "validate"]);
    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("[ERR]"))
        .stderr(predicate::str::contains("1 of 2 descriptor(s) failed"));
}

#[test]
fn validate_quiet_prints_only_failures() {
    let temp = TempDir::new().unwrap();
    write_package(temp.path(), "Good", descriptors::PROJECT);
    write_package(temp.path(), "Bad", descriptors::MISSING_KIND);

    let mut cmd = cargo_bin_cmd!("template-query");
    cmd.current_dir(temp.path())
        .args(["--color", "never", "validate", "--quiet"]);
    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("[OK]").not())
        .stdout(predicate::str::contains("[ERR]"));
}

#[test]
fn validate_reports_empty_tree_and_succeeds() {
    let temp = TempDir::new().unwrap();

    let mut cmd = cargo_bin_cmd!("template-query");
    cmd.current_dir(temp.path())
        .args(["--color", "never", "validate"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("No template descriptors found"));
}

#[test]
fn validate_rejects_invalid_json_syntax() {
    let temp = TempDir::new().unwrap();
    write_package(temp.path(), "Syntax", "{ not json");

    let mut cmd = cargo_bin_cmd!("template-query");
    cmd.current_dir(temp.path())
        .args(["--color", "never", "validate"]);
    cmd.assert().failure().stdout(predicate::str::contains("[ERR]"));
}
