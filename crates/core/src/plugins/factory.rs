//! Plugin factory for creating plugins and publishers from configuration.

use crate::plugins::adapters::{
    ChangelogWriter, CommitAnalyzer, DockerBuildxPlugin, GitCommitter, GitHubPlugin,
    ReleaseNotesGenerator,
};
use crate::plugins::base::{Plugin, PluginError};
use crate::plugins::cli_executor::CommandRunner;
use crate::plugins::options::PluginSettings;
use crate::plugins::plugin_type::PluginKind;
use crate::publish::docker::DockerPublisher;
use crate::publish::github::GitHubPublisher;
use crate::publish::Publisher;
use rk_protocol::config_models::{PluginOptions, PluginStep, PublishTarget, ReleaseConfig};
use std::sync::Arc;

/// Factory for creating plugin instances based on configuration.
///
/// The factory resolves the plugin kind from the configured name and
/// instantiates the matching adapter with its typed options.
pub struct PluginFactory;

impl PluginFactory {
    /// Create the pipeline step for a configured plugin.
    ///
    /// # Examples
    ///
    /// ```
    /// use rk_core::plugins::{CliExecutor, PluginFactory};
    /// use rk_protocol::config_models::PluginStep;
    ///
    /// let step = PluginStep::Bare("@semantic-release/commit-analyzer".to_string());
    /// let plugin = PluginFactory::create(&step, CliExecutor::shared()).unwrap();
    /// ```
    pub fn create(
        step: &PluginStep,
        runner: Arc<dyn CommandRunner>,
    ) -> Result<Arc<dyn Plugin>, PluginError> {
        let (_, settings) = resolve(step.name(), step.options())?;

        Ok(match settings {
            PluginSettings::CommitAnalyzer(options) => Arc::new(CommitAnalyzer::new(options, runner)),
            PluginSettings::ReleaseNotes(_) => Arc::new(ReleaseNotesGenerator),
            PluginSettings::Changelog(options) => Arc::new(ChangelogWriter::new(options)),
            PluginSettings::Git(options) => Arc::new(GitCommitter::new(options, runner)),
            PluginSettings::DockerBuildx(_) => Arc::new(DockerBuildxPlugin::new(runner)),
            PluginSettings::GitHub(_) => Arc::new(GitHubPlugin::new(runner)),
        })
    }

    /// Create the publisher for a publish target.
    ///
    /// Bare references take their options from the plugin step of the same
    /// name.
    pub fn create_publisher(
        target: &PublishTarget,
        config: &ReleaseConfig,
        runner: Arc<dyn CommandRunner>,
    ) -> Result<Arc<dyn Publisher>, PluginError> {
        let options = declared_step(config, target.path()).and_then(PluginStep::options);
        let (kind, settings) = resolve(target.path(), options)?;

        match (target, settings) {
            (PublishTarget::Image(image), PluginSettings::DockerBuildx(_)) => {
                Ok(Arc::new(DockerPublisher::new(image.clone(), runner)))
            }
            (PublishTarget::Reference(name), PluginSettings::GitHub(options)) => {
                Ok(Arc::new(GitHubPublisher::new(name.clone(), options, runner)))
            }
            _ => Err(PluginError::InvalidOptions(format!(
                "`{}` ({}) cannot publish this target",
                target.path(),
                kind.name()
            ))),
        }
    }
}

/// The plugin step a publish target refers to. The target may spell the
/// plugin by its full name or its alias.
fn declared_step<'a>(config: &'a ReleaseConfig, target: &str) -> Option<&'a PluginStep> {
    let kind = PluginKind::from_name(target)?;
    config
        .plugins
        .iter()
        .find(|step| PluginKind::from_name(step.name()) == Some(kind))
}

fn resolve(
    name: &str,
    options: Option<&PluginOptions>,
) -> Result<(PluginKind, PluginSettings), PluginError> {
    let kind = PluginKind::from_name(name)
        .ok_or_else(|| PluginError::NotAvailable(format!("Unknown plugin `{name}`")))?;
    let settings = PluginSettings::parse(kind, options)
        .map_err(|e| PluginError::InvalidOptions(format!("{name}: {e}")))?;
    Ok((kind, settings))
}
