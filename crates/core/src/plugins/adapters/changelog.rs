//! Changelog writer: prepends release notes to a changelog file.

use crate::engine::context::ReleaseContext;
use crate::plugins::base::{boxed, Plugin, PluginError, PluginEvent, PluginStream};
use crate::plugins::options::ChangelogOptions;
use async_stream::try_stream;
use async_trait::async_trait;
use rk_protocol::release_models::Artifact;
use std::path::{Path, PathBuf};

pub struct ChangelogWriter {
    options: ChangelogOptions,
}

impl ChangelogWriter {
    pub fn new(options: ChangelogOptions) -> Self {
        Self { options }
    }
}

#[async_trait]
impl Plugin for ChangelogWriter {
    async fn check_availability(&self) -> bool {
        true
    }

    async fn execute(&self, context: &ReleaseContext) -> Result<PluginStream, PluginError> {
        let notes = context
            .notes()
            .ok_or_else(|| {
                PluginError::MissingInput(
                    "release notes (the release notes generator must run first)".to_string(),
                )
            })?
            .to_string();

        let relative = PathBuf::from(&self.options.changelog_file);
        let path = context.cwd().join(&relative);
        let title = self.options.changelog_title.clone();
        let dry_run = context.dry_run();

        Ok(boxed(try_stream! {
            if dry_run {
                yield PluginEvent::Log(format!(
                    "Skip writing {} in dry-run mode",
                    relative.display()
                ));
                yield PluginEvent::Completed;
                return;
            }

            write_changelog(&path, &notes, title.as_deref()).await?;

            yield PluginEvent::Log(format!("Updated {}", relative.display()));
            yield PluginEvent::Artifact(Artifact::File(relative));
            yield PluginEvent::Completed;
        }))
    }
}

async fn write_changelog(
    path: &Path,
    notes: &str,
    title: Option<&str>,
) -> Result<(), PluginError> {
    let existing = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => {
            return Err(PluginError::ExecutionError(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            )))
        }
    };

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            PluginError::ExecutionError(format!("Failed to create {}: {}", parent.display(), e))
        })?;
    }

    let content = prepend_notes(&existing, notes, title);
    tokio::fs::write(path, content)
        .await
        .map_err(|e| PluginError::ExecutionError(format!("Failed to write {}: {}", path.display(), e)))
}

/// Put `notes` at the top of `existing`, below `title` when given.
pub fn prepend_notes(existing: &str, notes: &str, title: Option<&str>) -> String {
    let mut rest = existing.trim_start();
    let mut content = String::new();

    if let Some(title) = title {
        rest = rest.strip_prefix(title).unwrap_or(rest).trim_start();
        content.push_str(title);
        content.push_str("\n\n");
    }

    content.push_str(notes.trim_end());
    content.push('\n');

    if !rest.is_empty() {
        content.push('\n');
        content.push_str(rest);
    }

    content
}
