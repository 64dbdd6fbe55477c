//! GitHub release publishing through the `gh` CLI.

use crate::engine::context::ReleaseContext;
use crate::plugins::cli_executor::{CommandRunner, Invocation};
use crate::plugins::options::{AddReleases, GitHubOptions};
use crate::publish::{PublishError, Publisher};
use async_trait::async_trait;
use rk_protocol::release_models::PublishedRelease;
use std::sync::Arc;
use tracing::info;

/// Environment variables searched for a token, in order.
pub const TOKEN_VARIABLES: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

/// The first non-empty token variable and its value.
pub fn github_token(context: &ReleaseContext) -> Option<(&'static str, String)> {
    TOKEN_VARIABLES.iter().find_map(|name| {
        context
            .var(name)
            .filter(|value| !value.is_empty())
            .map(|value| (*name, value.to_string()))
    })
}

pub struct GitHubPublisher {
    name: String,
    options: GitHubOptions,
    runner: Arc<dyn CommandRunner>,
}

impl GitHubPublisher {
    pub fn new(name: impl Into<String>, options: GitHubOptions, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            name: name.into(),
            options,
            runner,
        }
    }
}

#[async_trait]
impl Publisher for GitHubPublisher {
    fn needs_other_releases(&self) -> bool {
        self.options.add_releases != AddReleases::Off
    }

    async fn publish(
        &self,
        context: &ReleaseContext,
        others: &[PublishedRelease],
    ) -> Result<PublishedRelease, PublishError> {
        let next = context.next_release().ok_or(PublishError::NoRelease)?;
        let (_, token) = github_token(context).ok_or_else(|| {
            PublishError::MissingCredentials(format!(
                "set one of {} to create GitHub releases",
                TOKEN_VARIABLES.join(", ")
            ))
        })?;

        let notes = compose_notes(
            context.notes().unwrap_or_default(),
            others,
            self.options.add_releases,
        );

        let mut invocation = Invocation::new("gh", context.cwd())
            .args(["release", "create"])
            .arg(next.git_tag.as_str())
            .arg("--title")
            .arg(next.git_tag.as_str())
            .arg("--notes")
            .arg(notes)
            .env("GH_TOKEN", token);
        if self.options.draft {
            invocation = invocation.arg("--draft");
        }
        if let Some(repository) = &self.options.repository {
            invocation = invocation.arg("--repo").arg(repository.as_str());
        }

        let output = self.runner.run(&invocation).await?;
        let url = output
            .stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .last()
            .map(str::to_string);

        info!(tag = %next.git_tag, url = url.as_deref().unwrap_or("-"), "created GitHub release");

        Ok(PublishedRelease {
            target: self.name.clone(),
            name: "GitHub release".to_string(),
            url,
            references: vec![next.git_tag.clone()],
        })
    }
}

/// Add an "Additional releases" section listing `others` to `notes`.
pub fn compose_notes(notes: &str, others: &[PublishedRelease], position: AddReleases) -> String {
    if position == AddReleases::Off || others.is_empty() {
        return notes.to_string();
    }

    let mut section = String::from("#### Additional releases\n\n");
    for release in others {
        match &release.url {
            Some(url) => section.push_str(&format!("- [{}]({})\n", release.name, url)),
            None if release.references.is_empty() => {
                section.push_str(&format!("- {}\n", release.name))
            }
            None => section.push_str(&format!(
                "- {}: {}\n",
                release.name,
                release.references.join(", ")
            )),
        }
    }

    let notes = notes.trim();
    if notes.is_empty() {
        return section;
    }

    match position {
        AddReleases::Top => format!("{section}\n---\n\n{notes}\n"),
        _ => format!("{notes}\n\n---\n\n{section}"),
    }
}
