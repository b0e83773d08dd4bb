//! End-to-end CLI checks
//!
//! These run the real binary in temp directories and never require an ajc
//! installation: every scenario either stops before toolchain resolution or
//! asserts the missing-tool failure itself.

use assert_cmd::Command;
use predicates::prelude::*;
use serial_test::serial;

fn ajw() -> Command {
    Command::cargo_bin("ajw").unwrap()
}

#[test]
fn init_creates_project_file() {
    let tmp = tempfile::tempdir().unwrap();

    ajw()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("created AJW.toml"));

    assert!(tmp.path().join("AJW.toml").exists());
}

#[test]
fn init_refuses_to_overwrite() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("AJW.toml"), "[project]\nname = \"app\"\n").unwrap();

    ajw()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn weave_outside_project_points_at_init() {
    let tmp = tempfile::tempdir().unwrap();

    ajw()
        .current_dir(tmp.path())
        .args(["weave", "some-input"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("AJW.toml"));
}

#[test]
fn weave_with_empty_inputs_exits_without_compiler() {
    // An existing but empty class directory: the transform bails out in the
    // no-augmentation path before ajc is ever resolved.
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("AJW.toml"), "[project]\nname = \"app\"\n").unwrap();
    let classes = tmp.path().join("classes");
    std::fs::create_dir_all(&classes).unwrap();

    ajw()
        .current_dir(tmp.path())
        .arg("weave")
        .arg(&classes)
        .assert()
        .success()
        .stderr(predicate::str::contains("w/o processing"));
}

#[test]
fn weave_rejects_invalid_config() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(
        tmp.path().join("AJW.toml"),
        "[project]\nname = \"app\"\n\n[aspectj]\npolicy = \"everything\"\n",
    )
    .unwrap();

    ajw()
        .current_dir(tmp.path())
        .args(["weave", "classes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("AJW.toml"));
}

#[test]
fn compile_without_sources_is_a_no_op() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("AJW.toml"), "[project]\nname = \"app\"\n").unwrap();

    ajw()
        .current_dir(tmp.path())
        .arg("compile")
        .assert()
        .success()
        .stdout(predicate::str::contains("no aspect sources"));
}

#[test]
#[serial]
fn check_reports_missing_toolchain() {
    let tmp = tempfile::tempdir().unwrap();

    ajw()
        .current_dir(tmp.path())
        .env("PATH", "")
        .env_remove("ASPECTJ_HOME")
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing tool: ajc"));
}

#[test]
fn clean_outside_project_fails() {
    let tmp = tempfile::tempdir().unwrap();

    ajw()
        .current_dir(tmp.path())
        .arg("clean")
        .assert()
        .failure()
        .stderr(predicate::str::contains("AJW.toml"));
}

#[test]
fn clean_removes_staging_dirs() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("AJW.toml"), "[project]\nname = \"app\"\n").unwrap();
    std::fs::create_dir_all(tmp.path().join("build/ajw/debug/classes")).unwrap();
    std::fs::create_dir_all(tmp.path().join("build/ajc/debug")).unwrap();

    ajw()
        .current_dir(tmp.path())
        .arg("clean")
        .assert()
        .success();

    assert!(!tmp.path().join("build/ajw").exists());
    assert!(!tmp.path().join("build/ajc").exists());
}
