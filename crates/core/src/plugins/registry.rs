//! Plugin registry for the release pipeline.
//!
//! The `PluginRegistry` is responsible for:
//! - Building plugin and publisher instances from the configuration
//! - Looking up plugins by their configured name
//! - Checking availability before a plugin runs

use crate::engine::context::ReleaseContext;
use crate::plugins::base::{Plugin, PluginError, PluginStream};
use crate::plugins::cli_executor::CommandRunner;
use crate::plugins::factory::PluginFactory;
use crate::publish::Publisher;
use anyhow::{Context, Result};
use rk_protocol::config_models::ReleaseConfig;
use std::collections::HashMap;
use std::sync::Arc;

/// Holds every plugin and publisher of a release.
///
/// Plugins are keyed by the name used in the configuration. Publishers
/// keep configuration order.
#[derive(Default)]
pub struct PluginRegistry {
    plugins: HashMap<String, Arc<dyn Plugin>>,
    publishers: Vec<(String, Arc<dyn Publisher>)>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the registry for a configuration.
    ///
    /// # Errors
    ///
    /// Fails if a plugin step or publish target cannot be instantiated.
    pub fn from_config(config: &ReleaseConfig, runner: Arc<dyn CommandRunner>) -> Result<Self> {
        let mut registry = Self::new();

        for step in &config.plugins {
            let plugin = PluginFactory::create(step, runner.clone())
                .with_context(|| format!("Failed to create plugin `{}`", step.name()))?;
            registry.register_plugin(step.name(), plugin);
        }

        for target in &config.publish {
            let publisher = PluginFactory::create_publisher(target, config, runner.clone())
                .with_context(|| format!("Failed to create publish target `{}`", target.path()))?;
            registry.register_publisher(target.path(), publisher);
        }

        Ok(registry)
    }

    pub fn with_plugin(mut self, name: impl Into<String>, plugin: Arc<dyn Plugin>) -> Self {
        self.register_plugin(name, plugin);
        self
    }

    pub fn register_plugin(&mut self, name: impl Into<String>, plugin: Arc<dyn Plugin>) {
        self.plugins.insert(name.into(), plugin);
    }

    pub fn with_publisher(mut self, name: impl Into<String>, publisher: Arc<dyn Publisher>) -> Self {
        self.register_publisher(name, publisher);
        self
    }

    pub fn register_publisher(&mut self, name: impl Into<String>, publisher: Arc<dyn Publisher>) {
        self.publishers.push((name.into(), publisher));
    }

    pub fn get_plugin(&self, name: &str) -> Option<Arc<dyn Plugin>> {
        self.plugins.get(name).cloned()
    }

    pub fn has_plugin(&self, name: &str) -> bool {
        self.plugins.contains_key(name)
    }

    /// List all registered plugin names.
    pub fn list_plugins(&self) -> Vec<String> {
        self.plugins.keys().cloned().collect()
    }

    /// Publishers in configuration order.
    pub fn publishers(&self) -> &[(String, Arc<dyn Publisher>)] {
        &self.publishers
    }

    /// Check a plugin's preconditions without executing it.
    ///
    /// # Behavior
    ///
    /// 1. Look up the plugin
    /// 2. Check that its external tool is available
    /// 3. Run its own verification
    pub async fn verify(&self, name: &str, context: &ReleaseContext) -> Result<(), PluginError> {
        let plugin = self.available_plugin(name).await?;
        plugin.verify(context).await
    }

    /// Execute a plugin by name.
    ///
    /// # Behavior
    ///
    /// 1. Look up the plugin
    /// 2. Check that its external tool is available
    /// 3. Execute it
    pub async fn execute(
        &self,
        name: &str,
        context: &ReleaseContext,
    ) -> Result<PluginStream, PluginError> {
        let plugin = self.available_plugin(name).await?;
        plugin.execute(context).await
    }

    async fn available_plugin(&self, name: &str) -> Result<Arc<dyn Plugin>, PluginError> {
        let plugin = self.get_plugin(name).ok_or_else(|| {
            PluginError::NotAvailable(format!("Plugin '{name}' not found in registry"))
        })?;

        if !plugin.check_availability().await {
            return Err(PluginError::NotAvailable(format!(
                "Plugin '{name}' is not available (required tool not found on PATH)"
            )));
        }

        Ok(plugin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::adapters::MockPlugin;
    use crate::plugins::base::PluginEvent;
    use crate::plugins::cli_executor::RecordingRunner;
    use tokio_stream::StreamExt;

    #[test]
    fn test_registry_from_config() {
        let config: ReleaseConfig = serde_yaml::from_str(
            r#"
plugins:
  - "@semantic-release/commit-analyzer"
  - changelog
  - "@semantic-release/github"
publish:
  - "@semantic-release/github"
"#,
        )
        .unwrap();

        let registry =
            PluginRegistry::from_config(&config, Arc::new(RecordingRunner::new())).unwrap();

        assert!(registry.has_plugin("@semantic-release/commit-analyzer"));
        assert!(registry.has_plugin("changelog"));
        assert!(!registry.has_plugin("@semantic-release/changelog"));
        assert_eq!(registry.list_plugins().len(), 3);
        assert_eq!(registry.publishers().len(), 1);
        assert_eq!(registry.publishers()[0].0, "@semantic-release/github");
    }

    #[test]
    fn test_registry_from_config_unknown_plugin() {
        let config: ReleaseConfig = serde_yaml::from_str("plugins: [npm]").unwrap();

        let err = PluginRegistry::from_config(&config, Arc::new(RecordingRunner::new()))
            .err()
            .expect("unknown plugin should fail");

        assert!(err.to_string().contains("Failed to create plugin `npm`"));
    }

    #[tokio::test]
    async fn test_registry_execute_success() {
        let registry = PluginRegistry::new().with_plugin("mock", Arc::new(MockPlugin::success()));

        let stream = registry
            .execute("mock", &ReleaseContext::new(".", "main"))
            .await
            .unwrap();
        let events: Vec<_> = stream.collect().await;

        assert_eq!(events.last(), Some(&Ok(PluginEvent::Completed)));
    }

    #[tokio::test]
    async fn test_registry_execute_not_found() {
        let registry = PluginRegistry::new();

        let result = registry.execute("missing", &ReleaseContext::new(".", "main")).await;

        assert!(matches!(result, Err(PluginError::NotAvailable(_))));
    }

    #[tokio::test]
    async fn test_registry_execute_unavailable() {
        let mock = MockPlugin::unavailable();
        let registry = PluginRegistry::new().with_plugin("mock", Arc::new(mock.clone()));

        let result = registry.execute("mock", &ReleaseContext::new(".", "main")).await;

        match result {
            Err(PluginError::NotAvailable(msg)) => assert!(msg.contains("not available")),
            _ => panic!("Expected NotAvailable"),
        }
        assert_eq!(mock.executions(), 0);
    }

    #[tokio::test]
    async fn test_registry_verify_does_not_execute() {
        let mock = MockPlugin::success();
        let registry = PluginRegistry::new()
            .with_plugin("mock", Arc::new(mock.clone()))
            .with_plugin("gone", Arc::new(MockPlugin::unavailable()));
        let context = ReleaseContext::new(".", "main");

        assert_eq!(registry.verify("mock", &context).await, Ok(()));
        assert!(matches!(
            registry.verify("gone", &context).await,
            Err(PluginError::NotAvailable(_))
        ));
        assert_eq!(mock.executions(), 0);
    }
}
