//! Base Plugin trait and supporting types.

use crate::engine::context::ReleaseContext;
use async_trait::async_trait;
use rk_protocol::release_models::Artifact;
use std::pin::Pin;
use thiserror::Error;
use tokio_stream::Stream;

/// Item produced by a running plugin step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluginEvent {
    /// Human-readable progress line.
    Log(String),
    /// Data to record in the release context.
    Artifact(Artifact),
    /// The step decided there is nothing to release; the run stops here.
    NoRelease(String),
    Completed,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PluginError {
    #[error("Plugin not available: {0}")]
    NotAvailable(String),
    #[error("Invalid plugin options: {0}")]
    InvalidOptions(String),
    #[error("Missing input: {0}")]
    MissingInput(String),
    #[error("Command `{command}` failed with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },
    #[error("Execution failed: {0}")]
    ExecutionError(String),
}

pub type PluginStream = Pin<Box<dyn Stream<Item = Result<PluginEvent, PluginError>> + Send>>;

/// Box a concrete event stream into a [`PluginStream`].
pub fn boxed<S>(stream: S) -> PluginStream
where
    S: Stream<Item = Result<PluginEvent, PluginError>> + Send + 'static,
{
    Box::pin(stream)
}

#[async_trait]
pub trait Plugin: Send + Sync {
    async fn check_availability(&self) -> bool;

    /// Check the plugin's preconditions before any step of the run executes.
    ///
    /// Must not change the repository or any remote.
    async fn verify(&self, _context: &ReleaseContext) -> Result<(), PluginError> {
        Ok(())
    }

    async fn execute(&self, context: &ReleaseContext) -> Result<PluginStream, PluginError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tokio_stream::StreamExt;

    struct TestPlugin {
        available: bool,
    }

    #[async_trait]
    impl Plugin for TestPlugin {
        async fn check_availability(&self) -> bool {
            self.available
        }

        async fn execute(&self, context: &ReleaseContext) -> Result<PluginStream, PluginError> {
            if !self.available {
                return Err(PluginError::NotAvailable("Test plugin not available".to_string()));
            }

            let branch = context.branch().to_string();
            let stream = tokio_stream::iter(vec![
                Ok(PluginEvent::Log(format!("Analyzing {}", branch))),
                Ok(PluginEvent::Artifact(Artifact::Notes("notes".to_string()))),
                Ok(PluginEvent::Completed),
            ]);

            Ok(Box::pin(stream))
        }
    }

    #[tokio::test]
    async fn test_plugin_check_availability() {
        assert!(TestPlugin { available: true }.check_availability().await);
        assert!(!TestPlugin { available: false }.check_availability().await);
    }

    #[tokio::test]
    async fn test_plugin_execute_success() {
        let plugin = TestPlugin { available: true };
        let context = ReleaseContext::new(PathBuf::from("."), "main");

        let mut stream = plugin.execute(&context).await.unwrap();
        let mut events = Vec::new();
        while let Some(event) = stream.next().await {
            events.push(event.unwrap());
        }

        assert_eq!(events.len(), 3);
        assert_eq!(events[0], PluginEvent::Log("Analyzing main".to_string()));
        assert!(matches!(events[1], PluginEvent::Artifact(Artifact::Notes(_))));
        assert_eq!(events[2], PluginEvent::Completed);
    }

    #[tokio::test]
    async fn test_plugin_execute_unavailable() {
        let plugin = TestPlugin { available: false };
        let context = ReleaseContext::new(PathBuf::from("."), "main");

        let result = plugin.execute(&context).await;
        assert!(matches!(result, Err(PluginError::NotAvailable(_))));
    }

    #[test]
    fn test_command_failed_display() {
        let error = PluginError::CommandFailed {
            command: "git push origin".to_string(),
            status: "exit code 128".to_string(),
            stderr: "permission denied".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Command `git push origin` failed with exit code 128: permission denied"
        );
    }
}
