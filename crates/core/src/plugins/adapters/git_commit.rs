//! Git committer: commits release assets, tags the release and pushes.

use crate::engine::context::ReleaseContext;
use crate::git::GitRepository;
use crate::plugins::base::{boxed, Plugin, PluginError, PluginEvent, PluginStream};
use crate::plugins::cli_executor::CommandRunner;
use crate::plugins::options::GitOptions;
use async_stream::try_stream;
use async_trait::async_trait;
use rk_protocol::release_models::Artifact;
use std::sync::Arc;

pub struct GitCommitter {
    options: GitOptions,
    runner: Arc<dyn CommandRunner>,
}

impl GitCommitter {
    pub fn new(options: GitOptions, runner: Arc<dyn CommandRunner>) -> Self {
        Self { options, runner }
    }
}

#[async_trait]
impl Plugin for GitCommitter {
    async fn check_availability(&self) -> bool {
        self.runner.is_available("git")
    }

    async fn execute(&self, context: &ReleaseContext) -> Result<PluginStream, PluginError> {
        let next = context.next_release().ok_or_else(|| {
            PluginError::MissingInput(
                "next release version (the commit analyzer must run first)".to_string(),
            )
        })?;

        let repo = GitRepository::new(context.cwd(), self.runner.clone());
        let message = context.render(&self.options.message);
        let assets = self.options.assets.clone();
        let git_tag = next.git_tag.clone();
        let branch = context.branch().to_string();
        let dry_run = context.dry_run();

        Ok(boxed(try_stream! {
            if dry_run {
                yield PluginEvent::Log(format!(
                    "Skip committing [{}], tagging {} and pushing to {} in dry-run mode",
                    assets.join(", "),
                    git_tag,
                    branch
                ));
                yield PluginEvent::Completed;
                return;
            }

            let changed = repo.changed_paths(&assets).await?;
            if changed.is_empty() {
                yield PluginEvent::Log("No release assets changed, nothing to commit".to_string());
            } else {
                repo.add(&changed).await?;
                repo.commit(&message).await?;
                let head = repo.head().await?;
                yield PluginEvent::Log(format!(
                    "Committed {} file(s) as {}",
                    changed.len(),
                    head
                ));
                yield PluginEvent::Artifact(Artifact::GitHead(head));
            }

            repo.tag(&git_tag).await?;
            repo.push(&branch, &git_tag).await?;
            yield PluginEvent::Log(format!("Pushed {} and tag {}", branch, git_tag));
            yield PluginEvent::Completed;
        }))
    }
}
