//! Test fixtures for release configurations and scripted repositories.

use rk_core::engine::context::ReleaseContext;
use rk_core::plugins::RecordingRunner;
use std::path::Path;
use tempfile::TempDir;

/// The configuration this tool was built around: six plugins, a
/// three-platform image target and a GitHub release.
pub const FULL_RELEASERC: &str = r#"
branches:
  - name: main
plugins:
  - "@semantic-release/commit-analyzer"
  - "@semantic-release/release-notes-generator"
  - - "@semantic-release/changelog"
    - changelogFile: CHANGELOG.md
  - - "@semantic-release/git"
    - assets: [CHANGELOG.md]
      message: "chore(release): ${nextRelease.version} [skip ci]\n\n${nextRelease.notes}"
  - semantic-release-docker-buildx
  - - "@semantic-release/github"
    - addReleases: bottom
publish:
  - path: semantic-release-docker-buildx
    buildArgs:
      COMMIT_TAG: $GIT_SHA
    imageNames: [betterdev/k8s-ci-cd]
    platforms: [linux/amd64, linux/arm64, linux/arm/v7]
  - "@semantic-release/github"
"#;

/// Create a temporary project holding `.releaserc.yaml`.
///
/// Returns a TempDir that must be kept alive for the test duration.
#[allow(dead_code)]
pub fn create_test_project(releaserc: &str) -> std::io::Result<TempDir> {
    let temp_dir = tempfile::tempdir()?;
    std::fs::write(temp_dir.path().join(".releaserc.yaml"), releaserc)?;
    Ok(temp_dir)
}

/// A runner scripted like a repository tagged `v1.3.0` with one feature
/// commit on top.
#[allow(dead_code)]
pub fn scripted_repository() -> RecordingRunner {
    RecordingRunner::new()
        .respond_to("git tag --merged", "v1.2.0\nv1.3.0\nv1.4.0-rc.1\n")
        .respond_to("git rev-list", "c0ffee0000000000000000000000000000000000\n")
        .respond_to(
            "git log",
            "b1a2c3d4e5f60000000000000000000000000000\x1ffeat(api): add release endpoint\n\x1e",
        )
        .respond_to("git status --porcelain", " M CHANGELOG.md\n")
        .respond_to("git rev-parse HEAD", "b1a2c3d4e5f60000000000000000000000000000\n")
        .respond_to(
            "gh release create",
            "https://github.com/betterdev/k8s-ci-cd/releases/tag/v1.4.0\n",
        )
}

/// A context on `main` in `cwd` with a commit SHA and a GitHub token.
#[allow(dead_code)]
pub fn release_context(cwd: &Path) -> ReleaseContext {
    ReleaseContext::new(cwd, "main")
        .with_var("GIT_SHA", "abc123")
        .with_var("GITHUB_TOKEN", "t0k3n")
}
