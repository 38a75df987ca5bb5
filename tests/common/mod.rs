use assert_cmd::{Command, cargo::cargo_bin_cmd};
use std::fs;
use std::path::Path;

/// Command with the database directory pinned to a per-test location, so
/// tests never touch the user's real database.
pub fn bundlecheck_cmd(db_dir: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("bundlecheck");
    cmd.env("BUNDLECHECK_DB_DIR", db_dir);
    cmd
}

/// Scans `root` and stores the snapshot as `<name>` in the database
/// directory. Some suites only exercise comparison against hand-written
/// database files, so this helper is intentionally unused there.
#[allow(dead_code)]
pub fn store_snapshot(db_dir: &Path, root: &Path, name: &str, description: &str) {
    bundlecheck_cmd(db_dir)
        .arg("--scan")
        .arg(root)
        .arg("--store")
        .arg(name)
        .arg("--description")
        .arg(description)
        .assert()
        .success();
}

/// Writes a snapshot document straight into the database directory.
#[allow(dead_code)]
pub fn write_db_file(db_dir: &Path, name: &str, json: &str) {
    fs::create_dir_all(db_dir).unwrap();
    fs::write(db_dir.join(name), json).unwrap();
}
