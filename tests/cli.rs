mod common;

use common::bundlecheck_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn missing_scan_and_load_is_a_usage_error() {
    let temp = TempDir::new().unwrap();

    bundlecheck_cmd(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn scan_and_load_together_is_a_usage_error() {
    let temp = TempDir::new().unwrap();

    bundlecheck_cmd(temp.path())
        .arg("--scan")
        .arg(temp.path())
        .arg("--load")
        .arg("snap.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn store_without_description_is_a_usage_error() {
    let temp = TempDir::new().unwrap();

    bundlecheck_cmd(temp.path())
        .arg("--scan")
        .arg(temp.path())
        .arg("--store")
        .arg("out.json")
        .assert()
        .failure();
}

#[test]
fn store_with_load_is_a_usage_error() {
    let temp = TempDir::new().unwrap();

    bundlecheck_cmd(temp.path())
        .arg("--load")
        .arg("snap.json")
        .arg("--store")
        .arg("out.json")
        .arg("--description")
        .arg("d")
        .assert()
        .failure();
}

#[test]
fn usage_errors_happen_before_any_work() {
    let temp = TempDir::new().unwrap();
    let db_dir = temp.path().join("db");

    // The scan path does not exist, but validation must fail first, on the
    // missing description.
    bundlecheck_cmd(&db_dir)
        .arg("--scan")
        .arg("/nonexistent/app")
        .arg("--store")
        .arg("out.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("IO error").not());

    assert!(!db_dir.join("out.json").exists());
}

#[test]
fn scan_of_nonexistent_root_is_a_fatal_io_error() {
    let temp = TempDir::new().unwrap();

    bundlecheck_cmd(temp.path())
        .arg("--scan")
        .arg("/nonexistent/app")
        .assert()
        .code(255)
        .stderr(predicate::str::contains("IO error"));
}

#[test]
fn invalid_ignore_pattern_is_a_fatal_configuration_error() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("app");
    fs::create_dir(&root).unwrap();

    bundlecheck_cmd(temp.path())
        .arg("--scan")
        .arg(&root)
        .arg("--ignore")
        .arg("[unclosed")
        .assert()
        .code(255)
        .stderr(predicate::str::contains("Invalid pattern"));
}

#[test]
fn version_flag_works() {
    let temp = TempDir::new().unwrap();

    bundlecheck_cmd(temp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("bundlecheck"));
}
