//! Release data shared between pipeline steps and publish targets.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Kind of version increment a release performs.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseType {
    Patch,
    Minor,
    Major,
}

impl ReleaseType {
    /// Parse `major` / `minor` / `patch`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "major" => Some(Self::Major),
            "minor" => Some(Self::Minor),
            "patch" => Some(Self::Patch),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Major => "major",
            Self::Minor => "minor",
            Self::Patch => "patch",
        }
    }
}

/// A commit taken into account by the release.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// Full commit hash.
    pub hash: String,

    /// Full commit message (subject and body).
    pub message: String,
}

impl Commit {
    pub fn new(hash: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            message: message.into(),
        }
    }

    /// First line of the message.
    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or_default()
    }

    /// Abbreviated hash used in notes.
    pub fn short_hash(&self) -> &str {
        self.hash.get(..7).unwrap_or(&self.hash)
    }
}

/// The most recent release found in the repository history.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LastRelease {
    pub version: String,
    pub git_tag: String,
    pub git_head: String,
}

/// The release being prepared.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NextRelease {
    pub version: String,
    pub release_type: ReleaseType,
    pub git_tag: String,
    pub git_head: String,
}

/// Output produced by a pipeline step and recorded in the release context.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Artifact {
    /// Release found before this run. At most one per run.
    LastRelease(LastRelease),

    /// Commits between the last release and `HEAD`.
    Commits(Vec<Commit>),

    /// Version computed for this run. At most one per run.
    NextRelease(NextRelease),

    /// Rendered release notes. At most one per run.
    Notes(String),

    /// File written or updated by a step.
    File(PathBuf),

    /// Commit created by a step.
    GitHead(String),
}

impl Artifact {
    /// Short label used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::LastRelease(_) => "lastRelease",
            Self::Commits(_) => "commits",
            Self::NextRelease(_) => "nextRelease",
            Self::Notes(_) => "notes",
            Self::File(_) => "file",
            Self::GitHead(_) => "gitHead",
        }
    }
}

/// Something a publish target published.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PublishedRelease {
    /// Name of the publish target (plugin path).
    pub target: String,

    /// Human-readable release name, e.g. `GitHub release`.
    pub name: String,

    /// Link to the release, when the destination has one.
    #[serde(default)]
    pub url: Option<String>,

    /// Published references such as image tags.
    #[serde(default)]
    pub references: Vec<String>,
}
