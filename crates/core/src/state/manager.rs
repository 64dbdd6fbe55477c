//! Release manager: one release from branch check to publishing.
//!
//! The ReleaseManager ties the pieces together. It decides whether the
//! branch may release, runs the pipeline and hands a successful release to
//! the publish dispatcher.

use crate::config::branches::matching_rule;
use crate::engine::context::ReleaseContext;
use crate::engine::{PipelineEngine, PipelineError, PipelineOutcome};
use crate::plugins::registry::PluginRegistry;
use crate::publish::{PublishDispatcher, PublishOutcome};
use crate::state::run::{begin_publishing, complete_run, create_run, skip_run};
use rk_protocol::config_models::ReleaseConfig;
use rk_protocol::ipc::Event;
use rk_protocol::release_models::NextRelease;
use rk_protocol::run_models::{ReleaseRun, RunStatus};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

/// Summary of a finished release run.
#[derive(Debug, Clone)]
pub struct ReleaseReport {
    /// Final run state.
    pub run: ReleaseRun,

    /// The release computed by the pipeline, if any.
    pub next_release: Option<NextRelease>,

    /// One outcome per publish target, in configuration order. Empty when
    /// nothing was published.
    pub outcomes: Vec<PublishOutcome>,

    /// Why no release was produced, for skipped runs.
    pub skip_reason: Option<String>,
}

impl ReleaseReport {
    /// Names of the publish targets that failed.
    pub fn failed_targets(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.is_failure())
            .map(|outcome| outcome.target.as_str())
            .collect()
    }

    /// Whether the run succeeded or was skipped, and no target failed.
    pub fn is_success(&self) -> bool {
        matches!(self.run.status, RunStatus::Completed | RunStatus::Skipped)
            && self.failed_targets().is_empty()
    }
}

/// Runs releases against one plugin registry.
pub struct ReleaseManager {
    registry: Arc<PluginRegistry>,
    engine: PipelineEngine,
    events_tx: mpsc::Sender<Event>,
}

impl ReleaseManager {
    /// Create a new ReleaseManager.
    ///
    /// # Arguments
    ///
    /// * `registry` - Plugins and publishers built from the configuration
    /// * `events_tx` - Channel for progress events
    pub fn new(registry: Arc<PluginRegistry>, events_tx: mpsc::Sender<Event>) -> Self {
        let engine = PipelineEngine::new(Arc::clone(&registry));
        Self {
            registry,
            engine,
            events_tx,
        }
    }

    /// Run one release.
    ///
    /// 1. Skip the run if the context's branch matches no branch rule
    /// 2. Run the plugin steps in order
    /// 3. Skip the run if no release was computed
    /// 4. Outside dry-run, dispatch every publish target
    ///
    /// # Errors
    ///
    /// Returns the [`PipelineError`] of the first failing step. Failed
    /// publish targets are not errors; they are listed in the report.
    pub async fn release(
        &self,
        config: &ReleaseConfig,
        mut context: ReleaseContext,
    ) -> Result<ReleaseReport, PipelineError> {
        let mut run = create_run(context.branch());
        let _ = self
            .events_tx
            .send(Event::ReleaseStarted {
                run_id: run.id,
                branch: run.branch.clone(),
            })
            .await;

        if matching_rule(&config.branches, context.branch()).is_none() {
            let reason = format!(
                "branch `{}` is not configured for release",
                context.branch()
            );
            info!(branch = context.branch(), "skipping release");
            return Ok(self.skipped(run, reason).await);
        }

        let outcome = self
            .engine
            .run(&config.plugins, &mut context, &mut run, &self.events_tx)
            .await?;

        let next_release = match (outcome, context.next_release().cloned()) {
            (PipelineOutcome::NoRelease(reason), _) => return Ok(self.skipped(run, reason).await),
            (PipelineOutcome::Completed, None) => {
                let reason = "no step computed a next release".to_string();
                return Ok(self.skipped(run, reason).await);
            }
            (PipelineOutcome::Completed, Some(next)) => next,
        };

        if context.dry_run() {
            info!(version = %next_release.version, "dry run, skipping publish");
            complete_run(&mut run, &self.events_tx, Some(next_release.version.clone())).await;
            return Ok(ReleaseReport {
                run,
                next_release: Some(next_release),
                outcomes: Vec::new(),
                skip_reason: None,
            });
        }

        begin_publishing(&mut run, &self.events_tx).await;
        let outcomes = PublishDispatcher::new(config.publish_concurrency)
            .with_fail_fast(config.publish_fail_fast)
            .dispatch(
                self.registry.publishers(),
                Arc::new(context),
                run.id,
                &self.events_tx,
            )
            .await;

        complete_run(&mut run, &self.events_tx, Some(next_release.version.clone())).await;

        Ok(ReleaseReport {
            run,
            next_release: Some(next_release),
            outcomes,
            skip_reason: None,
        })
    }

    async fn skipped(&self, mut run: ReleaseRun, reason: String) -> ReleaseReport {
        skip_run(&mut run, &self.events_tx, reason.clone()).await;
        ReleaseReport {
            run,
            next_release: None,
            outcomes: Vec::new(),
            skip_reason: Some(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::adapters::MockPlugin;
    use crate::plugins::base::PluginEvent;
    use rk_protocol::config_models::{BranchRule, PluginStep};
    use rk_protocol::release_models::{Artifact, ReleaseType};

    fn analyzer() -> MockPlugin {
        MockPlugin::new(
            true,
            vec![
                Ok(PluginEvent::Artifact(Artifact::NextRelease(NextRelease {
                    version: "1.0.0".to_string(),
                    release_type: ReleaseType::Major,
                    git_tag: "v1.0.0".to_string(),
                    git_head: "abc".to_string(),
                }))),
                Ok(PluginEvent::Completed),
            ],
        )
    }

    fn config() -> ReleaseConfig {
        ReleaseConfig {
            branches: vec![BranchRule::new("main"), BranchRule::new("release/*")],
            plugins: vec![PluginStep::Bare("analyzer".to_string())],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_release_on_glob_branch() {
        let registry = PluginRegistry::new().with_plugin("analyzer", Arc::new(analyzer()));
        let (tx, _rx) = mpsc::channel(100);
        let manager = ReleaseManager::new(Arc::new(registry), tx);

        let report = manager
            .release(&config(), ReleaseContext::new(".", "release/1.x"))
            .await
            .unwrap();

        assert_eq!(report.run.status, RunStatus::Completed);
        assert_eq!(report.next_release.clone().map(|n| n.version), Some("1.0.0".to_string()));
        assert!(report.is_success());
    }

    #[tokio::test]
    async fn test_unconfigured_branch_is_skipped() {
        let plugin = analyzer();
        let registry = PluginRegistry::new().with_plugin("analyzer", Arc::new(plugin.clone()));
        let (tx, _rx) = mpsc::channel(100);
        let manager = ReleaseManager::new(Arc::new(registry), tx);

        let report = manager
            .release(&config(), ReleaseContext::new(".", "feature/x"))
            .await
            .unwrap();

        assert_eq!(report.run.status, RunStatus::Skipped);
        assert_eq!(plugin.executions(), 0);
        assert!(report.skip_reason.clone().unwrap().contains("feature/x"));
        assert!(report.is_success());
    }

    #[tokio::test]
    async fn test_pipeline_without_next_release_is_skipped() {
        let registry = PluginRegistry::new().with_plugin("analyzer", Arc::new(MockPlugin::success()));
        let (tx, _rx) = mpsc::channel(100);
        let manager = ReleaseManager::new(Arc::new(registry), tx);

        let report = manager
            .release(&config(), ReleaseContext::new(".", "main"))
            .await
            .unwrap();

        assert_eq!(report.run.status, RunStatus::Skipped);
        assert!(report.outcomes.is_empty());
    }
}
