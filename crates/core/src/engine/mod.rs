//! Pipeline execution engine.
//!
//! The PipelineEngine runs the configured plugin steps sequentially,
//! records what each step produces into the release context and stops at
//! the first failing step.

pub mod context;

use crate::engine::context::{ContextError, ReleaseContext};
use crate::plugins::base::{PluginError, PluginEvent};
use crate::plugins::registry::PluginRegistry;
use crate::state::run::{advance_step, fail_run, log_to_run, start_run};
use rk_protocol::config_models::PluginStep;
use rk_protocol::ipc::Event;
use rk_protocol::run_models::ReleaseRun;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc::Sender;
use tokio_stream::StreamExt;
use tracing::{debug, info, warn};

/// A pipeline step failed. Later steps did not run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("Step {index} (`{plugin}`) failed: {source}")]
    StepFailed {
        index: usize,
        plugin: String,
        #[source]
        source: PluginError,
    },

    #[error("Step {index} (`{plugin}`) produced a conflicting result: {source}")]
    Context {
        index: usize,
        plugin: String,
        #[source]
        source: ContextError,
    },
}

impl PipelineError {
    /// Zero-based index of the failing step.
    pub fn step_index(&self) -> usize {
        match self {
            Self::StepFailed { index, .. } | Self::Context { index, .. } => *index,
        }
    }

    /// Name of the failing plugin, as configured.
    pub fn plugin(&self) -> &str {
        match self {
            Self::StepFailed { plugin, .. } | Self::Context { plugin, .. } => plugin,
        }
    }
}

/// How a pipeline that did not fail ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// Every step ran.
    Completed,

    /// A step decided there is nothing to release. Remaining steps did not run.
    NoRelease(String),
}

/// The main pipeline execution engine.
pub struct PipelineEngine {
    registry: Arc<PluginRegistry>,
}

impl PipelineEngine {
    /// Create a new PipelineEngine.
    ///
    /// # Arguments
    ///
    /// * `registry` - The registry holding one plugin per configured step
    pub fn new(registry: Arc<PluginRegistry>) -> Self {
        Self { registry }
    }

    /// Run `steps` in order against `context`.
    ///
    /// Starts `run` and verifies every step before any of them executes, so
    /// a missing tool or credential fails the run before anything is
    /// committed, tagged or pushed. Then, for each step:
    /// 1. Emits `StepStarted`
    /// 2. Checks availability and executes the plugin
    /// 3. Forwards its logs and records its artifacts into `context`
    /// 4. Emits `StepCompleted`
    ///
    /// # Errors
    ///
    /// The first step that fails verification or execution marks the run as
    /// failed and is returned as a [`PipelineError`]. No later step is
    /// executed.
    pub async fn run(
        &self,
        steps: &[PluginStep],
        context: &mut ReleaseContext,
        run: &mut ReleaseRun,
        events_tx: &Sender<Event>,
    ) -> Result<PipelineOutcome, PipelineError> {
        start_run(run, events_tx).await;

        if let Err(error) = self.verify_steps(steps, context).await {
            warn!(
                step = error.step_index(),
                plugin = error.plugin(),
                %error,
                "verification failed"
            );
            fail_run(run, events_tx, error.to_string()).await;
            return Err(error);
        }

        for (index, step) in steps.iter().enumerate() {
            if index > 0 {
                advance_step(run);
            }
            let plugin = step.name();

            info!(step = index, plugin, "running step");
            let _ = events_tx
                .send(Event::StepStarted {
                    run_id: run.id,
                    step_index: index,
                    plugin: plugin.to_string(),
                })
                .await;

            match self.execute_step(index, plugin, context, run, events_tx).await {
                Ok(None) => {}
                Ok(Some(reason)) => {
                    info!(step = index, plugin, %reason, "no release");
                    return Ok(PipelineOutcome::NoRelease(reason));
                }
                Err(error) => {
                    warn!(step = index, plugin, %error, "step failed");
                    fail_run(run, events_tx, error.to_string()).await;
                    return Err(error);
                }
            }

            let _ = events_tx
                .send(Event::StepCompleted {
                    run_id: run.id,
                    step_index: index,
                    plugin: plugin.to_string(),
                })
                .await;
        }

        Ok(PipelineOutcome::Completed)
    }

    async fn verify_steps(
        &self,
        steps: &[PluginStep],
        context: &ReleaseContext,
    ) -> Result<(), PipelineError> {
        for (index, step) in steps.iter().enumerate() {
            let plugin = step.name();
            debug!(step = index, plugin, "verifying step");
            self.registry
                .verify(plugin, context)
                .await
                .map_err(|source| PipelineError::StepFailed {
                    index,
                    plugin: plugin.to_string(),
                    source,
                })?;
        }
        Ok(())
    }

    /// Execute one step and drain its event stream.
    ///
    /// Returns the reason when the step reports that nothing is released.
    async fn execute_step(
        &self,
        index: usize,
        plugin: &str,
        context: &mut ReleaseContext,
        run: &mut ReleaseRun,
        events_tx: &Sender<Event>,
    ) -> Result<Option<String>, PipelineError> {
        let step_failed = |source: PluginError| PipelineError::StepFailed {
            index,
            plugin: plugin.to_string(),
            source,
        };

        let mut stream = self
            .registry
            .execute(plugin, context)
            .await
            .map_err(step_failed)?;

        while let Some(event) = stream.next().await {
            match event.map_err(step_failed)? {
                PluginEvent::Log(message) => {
                    log_to_run(run, events_tx, format!("[{plugin}] {message}")).await;
                }
                PluginEvent::Artifact(artifact) => {
                    let label = artifact.label();
                    context
                        .record(artifact)
                        .map_err(|source| PipelineError::Context {
                            index,
                            plugin: plugin.to_string(),
                            source,
                        })?;
                    debug!(step = index, plugin, artifact = label, "recorded artifact");
                }
                PluginEvent::NoRelease(reason) => {
                    log_to_run(run, events_tx, format!("[{plugin}] {reason}")).await;
                    return Ok(Some(reason));
                }
                PluginEvent::Completed => break,
            }
        }

        Ok(None)
    }
}
