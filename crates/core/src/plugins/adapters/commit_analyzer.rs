//! Commit analyzer: finds the last release and computes the next version.

use crate::engine::context::ReleaseContext;
use crate::git::GitRepository;
use crate::plugins::base::{boxed, Plugin, PluginError, PluginEvent, PluginStream};
use crate::plugins::cli_executor::CommandRunner;
use crate::plugins::conventional::{analyze_commits, next_version};
use crate::plugins::options::CommitAnalyzerOptions;
use async_stream::try_stream;
use async_trait::async_trait;
use rk_protocol::release_models::{Artifact, NextRelease};
use std::sync::Arc;

/// Reason reported when no commit warrants a release.
pub const NO_RELEVANT_CHANGES: &str = "There are no relevant changes, so no new version is released";

pub struct CommitAnalyzer {
    options: CommitAnalyzerOptions,
    runner: Arc<dyn CommandRunner>,
}

impl CommitAnalyzer {
    pub fn new(options: CommitAnalyzerOptions, runner: Arc<dyn CommandRunner>) -> Self {
        Self { options, runner }
    }
}

#[async_trait]
impl Plugin for CommitAnalyzer {
    async fn check_availability(&self) -> bool {
        self.runner.is_available("git")
    }

    async fn execute(&self, context: &ReleaseContext) -> Result<PluginStream, PluginError> {
        let repo = GitRepository::new(context.cwd(), self.runner.clone());
        let rules = self.options.release_rules.clone();
        let context = context.clone();

        Ok(boxed(try_stream! {
            yield PluginEvent::Log(format!("Analyzing commits on branch {}", context.branch()));

            let last = repo.last_release(context.tag_format()).await?;
            match &last {
                Some(last) => {
                    yield PluginEvent::Log(format!(
                        "Found git tag {} associated with version {} on branch {}",
                        last.git_tag, last.version, context.branch()
                    ));
                    yield PluginEvent::Artifact(Artifact::LastRelease(last.clone()));
                }
                None => {
                    yield PluginEvent::Log("No git tag version found, this is the first release".to_string());
                }
            }

            let commits = repo
                .commits_since(last.as_ref().map(|l| l.git_head.as_str()))
                .await?;
            yield PluginEvent::Log(format!("Found {} commits since last release", commits.len()));

            let release_type = analyze_commits(&commits, &rules);
            yield PluginEvent::Artifact(Artifact::Commits(commits));

            match release_type {
                None => {
                    yield PluginEvent::NoRelease(NO_RELEVANT_CHANGES.to_string());
                }
                Some(release_type) => {
                    let version = next_version(last.as_ref().map(|l| l.version.as_str()), release_type)?;
                    let git_head = repo.head().await?;
                    let git_tag = context.git_tag_for(&version);

                    yield PluginEvent::Log(format!(
                        "Analysis complete: {} release, next version is {}",
                        release_type.as_str(), version
                    ));
                    yield PluginEvent::Artifact(Artifact::NextRelease(NextRelease {
                        version,
                        release_type,
                        git_tag,
                        git_head,
                    }));
                    yield PluginEvent::Completed;
                }
            }
        }))
    }
}
