//! Release context shared by pipeline steps and publish targets.
//!
//! The context is append-only: single-valued artifacts (last release,
//! commits, next release, notes) can be recorded once, and later steps only
//! read what earlier steps recorded.

use rk_protocol::release_models::{Artifact, Commit, LastRelease, NextRelease};
use rk_protocol::VERSION_PLACEHOLDER;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    #[error("`{0}` has already been recorded for this release")]
    AlreadyRecorded(&'static str),
}

#[derive(Debug, Clone)]
pub struct ReleaseContext {
    cwd: PathBuf,
    branch: String,
    dry_run: bool,
    tag_format: String,
    env: HashMap<String, String>,
    last_release: Option<LastRelease>,
    commits: Option<Vec<Commit>>,
    next_release: Option<NextRelease>,
    notes: Option<String>,
    files: Vec<PathBuf>,
    git_heads: Vec<String>,
}

impl ReleaseContext {
    /// Create a context for `branch` in `cwd`.
    ///
    /// Defaults:
    /// - dry_run: false
    /// - tag_format: `v${version}`
    /// - env: empty
    pub fn new(cwd: impl Into<PathBuf>, branch: impl Into<String>) -> Self {
        Self {
            cwd: cwd.into(),
            branch: branch.into(),
            dry_run: false,
            tag_format: format!("v{VERSION_PLACEHOLDER}"),
            env: HashMap::new(),
            last_release: None,
            commits: None,
            next_release: None,
            notes: None,
            files: Vec::new(),
            git_heads: Vec::new(),
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_tag_format(mut self, tag_format: impl Into<String>) -> Self {
        self.tag_format = tag_format.into();
        self
    }

    /// Replace the environment snapshot used for substitutions and tokens.
    pub fn with_env<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env = vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self
    }

    /// Add one variable to the environment snapshot.
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn tag_format(&self) -> &str {
        &self.tag_format
    }

    /// Look up a variable in the environment snapshot.
    pub fn var(&self, name: &str) -> Option<&str> {
        self.env.get(name).map(String::as_str)
    }

    pub fn last_release(&self) -> Option<&LastRelease> {
        self.last_release.as_ref()
    }

    /// Commits since the last release; empty until the analyzer ran.
    pub fn commits(&self) -> &[Commit] {
        self.commits.as_deref().unwrap_or_default()
    }

    pub fn next_release(&self) -> Option<&NextRelease> {
        self.next_release.as_ref()
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Files written by earlier steps, in the order they were recorded.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Latest commit created by a step, if any.
    pub fn git_head(&self) -> Option<&str> {
        self.git_heads.last().map(String::as_str)
    }

    /// Tag name for `version` under the configured tag format.
    pub fn git_tag_for(&self, version: &str) -> String {
        self.tag_format.replacen(VERSION_PLACEHOLDER, version, 1)
    }

    /// Record an artifact produced by a step.
    pub fn record(&mut self, artifact: Artifact) -> Result<(), ContextError> {
        debug!(artifact = artifact.label(), "recording artifact");

        match artifact {
            Artifact::LastRelease(last) => set_once(&mut self.last_release, last, "lastRelease"),
            Artifact::Commits(commits) => set_once(&mut self.commits, commits, "commits"),
            Artifact::NextRelease(next) => set_once(&mut self.next_release, next, "nextRelease"),
            Artifact::Notes(notes) => set_once(&mut self.notes, notes, "notes"),
            Artifact::File(path) => {
                self.files.push(path);
                Ok(())
            }
            Artifact::GitHead(head) => {
                self.git_heads.push(head);
                Ok(())
            }
        }
    }

    /// Substitute release variables in a template.
    ///
    /// Supported: `${nextRelease.version}`, `${nextRelease.gitTag}`,
    /// `${nextRelease.type}`, `${nextRelease.notes}`,
    /// `${lastRelease.version}`, `${lastRelease.gitTag}`, `${branch.name}`.
    /// Unknown or unset variables render as empty strings.
    pub fn render(&self, template: &str) -> String {
        let next = self.next_release.as_ref();
        let last = self.last_release.as_ref();

        let values = [
            ("${nextRelease.version}", next.map(|n| n.version.as_str())),
            ("${nextRelease.gitTag}", next.map(|n| n.git_tag.as_str())),
            ("${nextRelease.type}", next.map(|n| n.release_type.as_str())),
            ("${lastRelease.version}", last.map(|l| l.version.as_str())),
            ("${lastRelease.gitTag}", last.map(|l| l.git_tag.as_str())),
            ("${branch.name}", Some(self.branch.as_str())),
        ];

        let mut rendered = template.to_string();
        for (placeholder, value) in values {
            rendered = rendered.replace(placeholder, value.unwrap_or_default());
        }
        // Notes last: they may contain text that looks like a placeholder.
        rendered.replace("${nextRelease.notes}", self.notes.as_deref().unwrap_or_default())
    }
}

fn set_once<T>(slot: &mut Option<T>, value: T, label: &'static str) -> Result<(), ContextError> {
    if slot.is_some() {
        return Err(ContextError::AlreadyRecorded(label));
    }
    *slot = Some(value);
    Ok(())
}
