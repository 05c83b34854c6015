//! E2E tests for the `info` command.

mod common;

use assert_cmd::cargo::cargo_bin_cmd;
use common::{descriptors, write_package};
use predicates::prelude::*;
use tempfile::TempDir;

#[test]
fn info_prints_template_summary() {
    let temp = TempDir::new().unwrap();
    let path = write_package(temp.path(), "Tool", descriptors::PROJECT);

    let mut cmd = cargo_bin_cmd!("template-query");
    cmd.arg("info").arg(&path);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Command Line Tool"))
        .stdout(predicate::str::contains("project template"))
        .stdout(predicate::str::contains(
            "product: com.apple.product-type.tool",
        ))
        .stdout(predicate::str::contains("settings: 1 shared"));
}

#[test]
fn info_marks_abstract_templates() {
    let temp = TempDir::new().unwrap();
    let path = write_package(temp.path(), "Base", descriptors::FILE_BASE);

    let mut cmd = cargo_bin_cmd!("template-query");
    cmd.arg("info").arg(&path);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("abstract"))
        .stdout(predicate::str::contains("com.example.base"))
        .stdout(predicate::str::contains("Greeting: raw"));
}

#[test]
fn info_fails_on_malformed_descriptor() {
    let temp = TempDir::new().unwrap();
    let path = write_package(temp.path(), "Broken", descriptors::MISSING_KIND);

    let mut cmd = cargo_bin_cmd!("template-query");
    cmd.arg("info").arg(&path);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("failed to load"));
}

#[test]
fn info_fails_on_missing_file() {
    let mut cmd = cargo_bin_cmd!("template-query");
    cmd.args(["info", "/nonexistent/TemplateInfo.json"]);
    cmd.assert().failure();
}
