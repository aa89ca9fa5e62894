//! CLI surface tests: exit codes and top-level diagnostics.
//!
//! Stages needing a live container engine are covered at the library level
//! with injected runners; these tests pin the command wiring.

use assert_cmd::Command;
use predicates::prelude::*;

fn apkforge() -> Command {
    Command::cargo_bin("apkforge").expect("binary builds")
}

#[test]
fn help_lists_every_stage_command() {
    apkforge()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("setup")
                .and(predicate::str::contains("build-artifact"))
                .and(predicate::str::contains("fix-artifact"))
                .and(predicate::str::contains("build-bundle"))
                .and(predicate::str::contains("clean")),
        );
}

#[test]
fn fix_artifact_without_an_artifact_exits_one() {
    let dir = tempfile::tempdir().expect("tempdir");
    apkforge()
        .args(["fix-artifact", "--project"])
        .arg(dir.path())
        .assert()
        .failure()
        .code(1)
        .stderr(
            predicate::str::contains("artifact not found")
                .and(predicate::str::contains("build-artifact")),
        );
}

#[test]
fn fix_artifact_rejects_a_corrupt_override() {
    let dir = tempfile::tempdir().expect("tempdir");
    let bogus = dir.path().join("broken.apk");
    std::fs::write(&bogus, b"not a zip").expect("write");

    apkforge()
        .args(["fix-artifact", "--project"])
        .arg(dir.path())
        .arg("--artifact")
        .arg(&bogus)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("not a valid archive"));
}

#[test]
fn invalid_config_is_reported_before_any_stage() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("apkforge.toml"), "[build\n").expect("write");

    apkforge()
        .args(["fix-artifact", "--project"])
        .arg(dir.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid project configuration"));
}

#[test]
fn clean_on_a_pristine_project_succeeds() {
    let dir = tempfile::tempdir().expect("tempdir");
    apkforge()
        .args(["clean", "--project"])
        .arg(dir.path())
        .assert()
        .success();
}

#[test]
fn missing_project_root_exits_one() {
    apkforge()
        .args(["clean", "--project", "/no/such/apkforge/project"])
        .assert()
        .failure()
        .code(1);
}
