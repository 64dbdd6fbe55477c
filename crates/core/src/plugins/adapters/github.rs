//! GitHub pipeline step: verifies that a token is available.
//!
//! The release itself is created by the publish stage.

use crate::engine::context::ReleaseContext;
use crate::plugins::base::{boxed, Plugin, PluginError, PluginEvent, PluginStream};
use crate::plugins::cli_executor::CommandRunner;
use crate::publish::github::{github_token, TOKEN_VARIABLES};
use async_trait::async_trait;
use std::sync::Arc;

pub struct GitHubPlugin {
    runner: Arc<dyn CommandRunner>,
}

impl GitHubPlugin {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }
}

#[async_trait]
impl Plugin for GitHubPlugin {
    async fn check_availability(&self) -> bool {
        self.runner.is_available("gh")
    }

    async fn verify(&self, context: &ReleaseContext) -> Result<(), PluginError> {
        token_variable(context).map(|_| ())
    }

    async fn execute(&self, context: &ReleaseContext) -> Result<PluginStream, PluginError> {
        let variable = token_variable(context)?;

        Ok(boxed(tokio_stream::iter(vec![
            Ok(PluginEvent::Log(format!("Verified GitHub authentication from {variable}"))),
            Ok(PluginEvent::Completed),
        ])))
    }
}

fn token_variable(context: &ReleaseContext) -> Result<&'static str, PluginError> {
    github_token(context).map(|(variable, _)| variable).ok_or_else(|| {
        PluginError::MissingInput(format!(
            "a GitHub token in one of {}",
            TOKEN_VARIABLES.join(", ")
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::cli_executor::RecordingRunner;

    #[tokio::test]
    async fn test_requires_token() {
        let plugin = GitHubPlugin::new(Arc::new(RecordingRunner::new()));

        let missing = plugin.execute(&ReleaseContext::new(".", "main")).await;
        assert!(matches!(missing, Err(PluginError::MissingInput(_))));

        let context = ReleaseContext::new(".", "main").with_var("GH_TOKEN", "t0k3n");
        assert!(plugin.execute(&context).await.is_ok());
    }

    #[tokio::test]
    async fn test_verify_requires_token() {
        let plugin = GitHubPlugin::new(Arc::new(RecordingRunner::new()));

        let missing = plugin.verify(&ReleaseContext::new(".", "main")).await;
        assert!(matches!(missing, Err(PluginError::MissingInput(_))));

        let context = ReleaseContext::new(".", "main").with_var("GITHUB_TOKEN", "t0k3n");
        assert_eq!(plugin.verify(&context).await, Ok(()));
    }
}
