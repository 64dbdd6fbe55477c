//! Conventional commit parsing and version bumping.

use crate::plugins::base::PluginError;
use crate::plugins::options::ReleaseRule;
use rk_protocol::release_models::{Commit, ReleaseType};

/// Version used when the repository has never been released.
pub const FIRST_RELEASE: &str = "1.0.0";

/// A commit message in `type(scope)!: subject` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConventionalCommit {
    pub kind: String,
    pub scope: Option<String>,
    pub subject: String,
    pub breaking: bool,
    /// Text of a `BREAKING CHANGE:` footer, if any.
    pub breaking_note: Option<String>,
}

/// Parse a commit message.
///
/// Returns `None` for messages that are not conventional commits.
pub fn parse(message: &str) -> Option<ConventionalCommit> {
    let (header, rest) = message.split_once('\n').unwrap_or((message, ""));
    let (prefix, subject) = header.split_once(':')?;

    let (prefix, bang) = match prefix.strip_suffix('!') {
        Some(prefix) => (prefix, true),
        None => (prefix, false),
    };

    let (kind, scope) = match prefix.split_once('(') {
        Some((kind, scope)) => {
            let scope = scope.strip_suffix(')')?;
            if scope.is_empty() || scope.contains(['(', ')']) {
                return None;
            }
            (kind, Some(scope.to_string()))
        }
        None => (prefix, None),
    };

    if kind.is_empty() || !kind.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }

    let subject = subject.trim();
    if subject.is_empty() {
        return None;
    }

    let breaking_note = rest.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        let key = key.trim();
        (key == "BREAKING CHANGE" || key == "BREAKING-CHANGE").then(|| value.trim().to_string())
    });

    Some(ConventionalCommit {
        kind: kind.to_ascii_lowercase(),
        scope,
        subject: subject.to_string(),
        breaking: bang || breaking_note.is_some(),
        breaking_note,
    })
}

fn default_release(commit: &ConventionalCommit) -> Option<ReleaseType> {
    if commit.breaking {
        return Some(ReleaseType::Major);
    }
    match commit.kind.as_str() {
        "feat" => Some(ReleaseType::Minor),
        "fix" | "perf" | "revert" => Some(ReleaseType::Patch),
        _ => None,
    }
}

fn custom_release(commit: &ConventionalCommit, rules: &[ReleaseRule]) -> Option<ReleaseType> {
    rules
        .iter()
        .filter(|rule| rule.kind == commit.kind)
        .filter(|rule| match &rule.scope {
            Some(scope) => commit.scope.as_deref() == Some(scope.as_str()),
            None => true,
        })
        .map(|rule| rule.release)
        .max()
}

/// Release type implied by one commit.
///
/// Custom rules can raise the release type of a commit but never lower it
/// below the default classification.
pub fn classify(commit: &ConventionalCommit, rules: &[ReleaseRule]) -> Option<ReleaseType> {
    default_release(commit).max(custom_release(commit, rules))
}

/// Highest release type across all commits, or `None` when nothing is
/// release-worthy.
pub fn analyze_commits(commits: &[Commit], rules: &[ReleaseRule]) -> Option<ReleaseType> {
    commits
        .iter()
        .filter_map(|commit| parse(&commit.message))
        .filter_map(|commit| classify(&commit, rules))
        .max()
}

/// Compute the next version from the last released one.
pub fn next_version(last: Option<&str>, release_type: ReleaseType) -> Result<String, PluginError> {
    let Some(last) = last else {
        return Ok(FIRST_RELEASE.to_string());
    };

    let version = semver::Version::parse(last).map_err(|e| {
        PluginError::ExecutionError(format!("Last release `{last}` is not a semantic version: {e}"))
    })?;

    let next = match release_type {
        ReleaseType::Major => semver::Version::new(version.major + 1, 0, 0),
        ReleaseType::Minor => semver::Version::new(version.major, version.minor + 1, 0),
        ReleaseType::Patch => semver::Version::new(version.major, version.minor, version.patch + 1),
    };

    Ok(next.to_string())
}
