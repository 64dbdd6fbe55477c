//! Docker buildx pipeline step: verifies the builder is usable.
//!
//! Images are built and pushed by the publish stage.

use crate::engine::context::ReleaseContext;
use crate::plugins::base::{boxed, Plugin, PluginError, PluginEvent, PluginStream};
use crate::plugins::cli_executor::{CommandRunner, Invocation};
use async_stream::try_stream;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

pub struct DockerBuildxPlugin {
    runner: Arc<dyn CommandRunner>,
}

impl DockerBuildxPlugin {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }
}

#[async_trait]
impl Plugin for DockerBuildxPlugin {
    async fn check_availability(&self) -> bool {
        self.runner.is_available("docker")
    }

    async fn verify(&self, context: &ReleaseContext) -> Result<(), PluginError> {
        buildx_version(self.runner.as_ref(), context.cwd()).await.map(|_| ())
    }

    async fn execute(&self, context: &ReleaseContext) -> Result<PluginStream, PluginError> {
        let runner = self.runner.clone();
        let cwd = context.cwd().to_path_buf();

        Ok(boxed(try_stream! {
            let version = buildx_version(runner.as_ref(), &cwd).await?;
            yield PluginEvent::Log(format!("Using {}", version));
            yield PluginEvent::Completed;
        }))
    }
}

/// First line of `docker buildx version`.
async fn buildx_version(runner: &dyn CommandRunner, cwd: &Path) -> Result<String, PluginError> {
    let invocation = Invocation::new("docker", cwd).args(["buildx", "version"]);
    let output = runner.run(&invocation).await?;
    Ok(output.stdout.lines().next().unwrap_or_default().trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::cli_executor::RecordingRunner;
    use tokio_stream::StreamExt;

    #[tokio::test]
    async fn test_verifies_buildx() {
        let runner = Arc::new(
            RecordingRunner::new().respond_to("buildx version", "github.com/docker/buildx v0.12.1\n"),
        );
        let plugin = DockerBuildxPlugin::new(runner.clone());

        let events: Vec<_> = plugin
            .execute(&ReleaseContext::new(".", "main"))
            .await
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .await
            .unwrap();

        assert_eq!(
            events[0],
            PluginEvent::Log("Using github.com/docker/buildx v0.12.1".to_string())
        );
        assert_eq!(runner.command_lines(), vec!["docker buildx version"]);
    }

    #[tokio::test]
    async fn test_verify_fails_without_buildx() {
        let runner = Arc::new(
            RecordingRunner::new().fail_on("buildx version", "docker: 'buildx' is not a docker command."),
        );
        let plugin = DockerBuildxPlugin::new(runner);

        let result = plugin.verify(&ReleaseContext::new(".", "main")).await;

        assert!(matches!(result, Err(PluginError::CommandFailed { .. })));
    }

    #[tokio::test]
    async fn test_unavailable_without_docker() {
        let plugin = DockerBuildxPlugin::new(Arc::new(RecordingRunner::new().unavailable("docker")));
        assert!(!plugin.check_availability().await);
    }
}
