use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const RELEASERC: &str = r#"
branches:
  - main
plugins:
  - "@semantic-release/commit-analyzer"
  - "@semantic-release/release-notes-generator"
  - - "@semantic-release/changelog"
    - changelogFile: CHANGELOG.md
  - semantic-release-docker-buildx
publish:
  - path: semantic-release-docker-buildx
    buildArgs:
      COMMIT_TAG: $GIT_SHA
    imageNames: [betterdev/k8s-ci-cd]
    platforms: [linux/amd64, linux/arm64]
"#;

fn release() -> Command {
    let mut cmd = Command::cargo_bin("release").expect("binary exists");
    cmd.env_remove("RUST_LOG")
        .env_remove("RELEASE_BRANCH")
        .env("NO_COLOR", "1");
    cmd
}

fn project(releaserc: &str) -> TempDir {
    let dir = tempfile::tempdir().expect("create temp dir");
    fs::write(dir.path().join(".releaserc.yaml"), releaserc).expect("write config");
    dir
}

#[test]
fn help_lists_subcommands() {
    release()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("run")
                .and(predicate::str::contains("check"))
                .and(predicate::str::contains("init")),
        );
}

#[test]
fn check_prints_plan_in_order() {
    let dir = project(RELEASERC);

    release()
        .args(["check", "--cwd"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(
            predicate::str::contains("1. @semantic-release/commit-analyzer")
                .and(predicate::str::contains("4. semantic-release-docker-buildx"))
                .and(predicate::str::contains("linux/amd64, linux/arm64"))
                .and(predicate::str::contains("Configuration is valid")),
        );
}

#[test]
fn check_json_outputs_configuration() {
    let dir = project(RELEASERC);

    let output = release()
        .args(["check", "--json", "--cwd"])
        .arg(dir.path())
        .output()
        .expect("run release check");

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(json["plugins"].as_array().map(Vec::len), Some(4));
    assert_eq!(json["publishConcurrency"], 4);
}

#[test]
fn check_rejects_unknown_plugin() {
    let dir = project("plugins:\n  - \"@semantic-release/npm\"\n");

    release()
        .args(["check", "--cwd"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown plugin `@semantic-release/npm`"));
}

#[test]
fn check_without_configuration_fails() {
    let dir = tempfile::tempdir().expect("create temp dir");

    release()
        .args(["check", "--cwd"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains(".releaserc"));
}

#[test]
fn init_writes_configuration_once() {
    let dir = tempfile::tempdir().expect("create temp dir");

    release()
        .args(["init", "--cwd"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(".releaserc.yaml"));
    assert!(dir.path().join(".releaserc.yaml").exists());

    release()
        .args(["init", "--cwd"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    release()
        .args(["init", "--force", "--minimal", "--cwd"])
        .arg(dir.path())
        .assert()
        .success();

    release()
        .args(["check", "--cwd"])
        .arg(dir.path())
        .assert()
        .success();
}

#[test]
fn run_on_unconfigured_branch_is_skipped() {
    let dir = project(RELEASERC);

    release()
        .args(["run", "--dry-run", "--branch", "feature/login", "--cwd"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "branch `feature/login` is not configured for release",
        ));
}

#[cfg(unix)]
#[test]
fn run_ignores_non_unicode_environment() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = project(RELEASERC);

    release()
        .env("RELEASE_LATIN1", OsStr::from_bytes(b"caf\xe9"))
        .args(["run", "--dry-run", "--branch", "feature/login", "--cwd"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("is not configured for release"));
}
