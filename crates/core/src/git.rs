//! Git operations used by the release pipeline.
//!
//! All commands go through a [`CommandRunner`], so the same code drives the
//! system `git` binary and the recording runner used in tests.

use crate::plugins::base::PluginError;
use crate::plugins::cli_executor::{CommandRunner, Invocation};
use rk_protocol::release_models::{Commit, LastRelease};
use rk_protocol::VERSION_PLACEHOLDER;
use std::path::PathBuf;
use std::sync::Arc;

const FIELD_SEPARATOR: char = '\x1f';
const RECORD_SEPARATOR: char = '\x1e';

/// A git working tree.
#[derive(Clone)]
pub struct GitRepository {
    cwd: PathBuf,
    runner: Arc<dyn CommandRunner>,
}

impl GitRepository {
    pub fn new(cwd: impl Into<PathBuf>, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            cwd: cwd.into(),
            runner,
        }
    }

    async fn git<I, S>(&self, args: I) -> Result<String, PluginError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let invocation = Invocation::new("git", &self.cwd).args(args);
        let output = self.runner.run(&invocation).await?;
        Ok(output.stdout)
    }

    /// Name of the checked-out branch (`HEAD` when detached).
    pub async fn current_branch(&self) -> Result<String, PluginError> {
        Ok(self
            .git(["rev-parse", "--abbrev-ref", "HEAD"])
            .await?
            .trim()
            .to_string())
    }

    /// SHA of `HEAD`.
    pub async fn head(&self) -> Result<String, PluginError> {
        Ok(self.git(["rev-parse", "HEAD"]).await?.trim().to_string())
    }

    /// Highest released version reachable from `HEAD`.
    ///
    /// Only tags matching `tag_format` whose version part is a plain
    /// semantic version (no pre-release) count as releases.
    pub async fn last_release(&self, tag_format: &str) -> Result<Option<LastRelease>, PluginError> {
        let pattern = tag_format.replacen(VERSION_PLACEHOLDER, "*", 1);
        let tags = self
            .git(["tag".to_string(), "--merged".to_string(), "HEAD".to_string(), "--list".to_string(), pattern])
            .await?;

        let latest = tags
            .lines()
            .map(str::trim)
            .filter_map(|tag| version_from_tag(tag, tag_format).map(|version| (version, tag)))
            .max_by(|(a, _), (b, _)| a.cmp(b));

        let Some((version, tag)) = latest else {
            return Ok(None);
        };

        let git_head = self
            .git(["rev-list", "-n", "1", tag])
            .await?
            .trim()
            .to_string();

        Ok(Some(LastRelease {
            version: version.to_string(),
            git_tag: tag.to_string(),
            git_head,
        }))
    }

    /// Commits reachable from `HEAD` but not from `since`, newest first.
    pub async fn commits_since(&self, since: Option<&str>) -> Result<Vec<Commit>, PluginError> {
        let format = format!("--format=%H{FIELD_SEPARATOR}%B{RECORD_SEPARATOR}");
        let range = match since {
            Some(sha) => format!("{sha}..HEAD"),
            None => "HEAD".to_string(),
        };

        let log = self.git(["log".to_string(), format, range]).await?;
        Ok(parse_log(&log))
    }

    /// Paths among `paths` with uncommitted changes.
    pub async fn changed_paths(&self, paths: &[String]) -> Result<Vec<String>, PluginError> {
        let status = self
            .git(
                ["status", "--porcelain", "--"]
                    .into_iter()
                    .map(String::from)
                    .chain(paths.iter().cloned()),
            )
            .await?;

        Ok(status
            .lines()
            .filter_map(|line| line.get(3..))
            .map(|path| path.trim().to_string())
            .filter(|path| !path.is_empty())
            .collect())
    }

    pub async fn add(&self, paths: &[String]) -> Result<(), PluginError> {
        self.git(
            ["add", "--"]
                .into_iter()
                .map(String::from)
                .chain(paths.iter().cloned()),
        )
        .await?;
        Ok(())
    }

    pub async fn commit(&self, message: &str) -> Result<(), PluginError> {
        self.git(["commit", "-m", message]).await?;
        Ok(())
    }

    pub async fn tag(&self, name: &str) -> Result<(), PluginError> {
        self.git(["tag", name]).await?;
        Ok(())
    }

    /// Push `HEAD` to `branch` on `origin`, together with `tag`.
    pub async fn push(&self, branch: &str, tag: &str) -> Result<(), PluginError> {
        self.git([
            "push".to_string(),
            "origin".to_string(),
            format!("HEAD:refs/heads/{branch}"),
            format!("refs/tags/{tag}"),
        ])
        .await?;
        Ok(())
    }
}

/// Extract the version from a tag built with `tag_format`.
pub fn version_from_tag(tag: &str, tag_format: &str) -> Option<semver::Version> {
    let (prefix, suffix) = tag_format.split_once(VERSION_PLACEHOLDER)?;
    let version = tag.strip_prefix(prefix)?.strip_suffix(suffix)?;
    let version = semver::Version::parse(version).ok()?;
    version.pre.is_empty().then_some(version)
}

fn parse_log(log: &str) -> Vec<Commit> {
    log.split(RECORD_SEPARATOR)
        .filter_map(|record| {
            let (hash, message) = record.split_once(FIELD_SEPARATOR)?;
            let hash = hash.trim();
            if hash.is_empty() {
                return None;
            }
            Some(Commit::new(hash, message.trim()))
        })
        .collect()
}
