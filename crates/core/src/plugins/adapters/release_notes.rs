//! Release notes generator: renders grouped markdown notes from commits.

use crate::engine::context::ReleaseContext;
use crate::plugins::base::{boxed, Plugin, PluginError, PluginEvent, PluginStream};
use crate::plugins::conventional::{parse, ConventionalCommit};
use async_trait::async_trait;
use chrono::NaiveDate;
use rk_protocol::release_models::{Artifact, Commit};

const SECTIONS: [(&str, &[&str]); 4] = [
    ("Features", &["feat"]),
    ("Bug Fixes", &["fix"]),
    ("Performance Improvements", &["perf"]),
    ("Reverts", &["revert"]),
];

pub struct ReleaseNotesGenerator;

#[async_trait]
impl Plugin for ReleaseNotesGenerator {
    async fn check_availability(&self) -> bool {
        true
    }

    async fn execute(&self, context: &ReleaseContext) -> Result<PluginStream, PluginError> {
        let next = context.next_release().ok_or_else(|| {
            PluginError::MissingInput(
                "next release version (the commit analyzer must run first)".to_string(),
            )
        })?;

        let date = chrono::Utc::now().date_naive();
        let notes = render_notes(&next.version, date, context.commits());

        Ok(boxed(tokio_stream::iter(vec![
            Ok(PluginEvent::Log(format!(
                "Generated release notes for version {}",
                next.version
            ))),
            Ok(PluginEvent::Artifact(Artifact::Notes(notes))),
            Ok(PluginEvent::Completed),
        ])))
    }
}

fn entry(commit: &Commit, parsed: &ConventionalCommit, text: &str) -> String {
    match &parsed.scope {
        Some(scope) => format!("* **{}:** {} ({})\n", scope, text, commit.short_hash()),
        None => format!("* {} ({})\n", text, commit.short_hash()),
    }
}

/// Render markdown notes for `version`.
///
/// Commits that are not conventional, or whose type has no section, are
/// left out unless they carry a breaking change.
pub fn render_notes(version: &str, date: NaiveDate, commits: &[Commit]) -> String {
    let parsed: Vec<(&Commit, ConventionalCommit)> = commits
        .iter()
        .filter_map(|commit| parse(&commit.message).map(|parsed| (commit, parsed)))
        .collect();

    let mut notes = format!("## {} ({})\n", version, date.format("%Y-%m-%d"));

    let breaking: String = parsed
        .iter()
        .filter(|(_, p)| p.breaking)
        .map(|(commit, p)| entry(commit, p, p.breaking_note.as_deref().unwrap_or(&p.subject)))
        .collect();
    if !breaking.is_empty() {
        notes.push_str("\n### BREAKING CHANGES\n\n");
        notes.push_str(&breaking);
    }

    for (title, kinds) in SECTIONS {
        let items: String = parsed
            .iter()
            .filter(|(_, p)| kinds.contains(&p.kind.as_str()))
            .map(|(commit, p)| entry(commit, p, &p.subject))
            .collect();
        if !items.is_empty() {
            notes.push_str(&format!("\n### {title}\n\n"));
            notes.push_str(&items);
        }
    }

    notes
}
