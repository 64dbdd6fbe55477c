//! Publish stage: targets that run after the pipeline succeeded.
//!
//! Each target implements [`Publisher`]. The [`PublishDispatcher`] runs
//! them concurrently, best-effort: a failing target is reported and the
//! others still run.

pub mod build_args;
pub mod dispatcher;
pub mod docker;
pub mod github;

use crate::engine::context::ReleaseContext;
use crate::plugins::base::PluginError;
use async_trait::async_trait;
use rk_protocol::release_models::PublishedRelease;
use thiserror::Error;

pub use dispatcher::{PublishDispatcher, PublishOutcome, PublishStatus};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PublishError {
    #[error("Build argument `{argument}` references unset environment variable `{variable}`")]
    MissingVariable { argument: String, variable: String },

    #[error("Build argument `{argument}` has an unterminated `${{` placeholder")]
    UnterminatedPlaceholder { argument: String },

    #[error("No release to publish (the pipeline did not compute a next release)")]
    NoRelease,

    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    #[error(transparent)]
    Plugin(#[from] PluginError),

    #[error("Publish task failed: {0}")]
    TaskFailed(String),
}

#[async_trait]
pub trait Publisher: Send + Sync {
    /// Whether this target lists the releases of the other targets, and
    /// therefore has to run after them.
    fn needs_other_releases(&self) -> bool {
        false
    }

    async fn publish(
        &self,
        context: &ReleaseContext,
        others: &[PublishedRelease],
    ) -> Result<PublishedRelease, PublishError>;
}
