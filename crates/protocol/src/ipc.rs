//! Progress events emitted while a release runs.
//!
//! The core sends `Event`s through a channel so front-ends (the CLI printer,
//! CI log formatters) can report progress without touching pipeline state.
//!
//! Events use tagged serialization:
//! ```json
//! {
//!   "type": "stepStarted",
//!   "payload": { "run_id": "uuid-here", "step_index": 0, "plugin": "@semantic-release/git" }
//! }
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::release_models::PublishedRelease;
use crate::run_models::RunStatus;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Event {
    /// A release run has been created.
    ReleaseStarted { run_id: Uuid, branch: String },

    /// The run's status has changed.
    RunStatusUpdate {
        run_id: Uuid,
        status: RunStatus,
        step_index: usize,
    },

    /// A pipeline step is about to execute.
    StepStarted {
        run_id: Uuid,
        step_index: usize,
        plugin: String,
    },

    /// A pipeline step finished successfully.
    StepCompleted {
        run_id: Uuid,
        step_index: usize,
        plugin: String,
    },

    /// A pipeline step or publish target produced log output.
    RunLogChunk { run_id: Uuid, content: String },

    /// The run ended without producing a release.
    ReleaseSkipped { run_id: Uuid, reason: String },

    /// A publish target started.
    PublishStarted { run_id: Uuid, target: String },

    /// A publish target finished successfully.
    PublishCompleted {
        run_id: Uuid,
        release: PublishedRelease,
    },

    /// A publish target failed. Other targets are unaffected.
    PublishFailed {
        run_id: Uuid,
        target: String,
        error: String,
    },

    /// A publish target was not started because an earlier one failed.
    PublishSkipped { run_id: Uuid, target: String },

    /// The run finished.
    ReleaseCompleted {
        run_id: Uuid,
        version: Option<String>,
    },

    /// The pipeline failed; nothing was published.
    ReleaseFailed { run_id: Uuid, error: String },
}

impl Event {
    /// The run this event belongs to.
    pub fn run_id(&self) -> Uuid {
        match self {
            Self::ReleaseStarted { run_id, .. }
            | Self::RunStatusUpdate { run_id, .. }
            | Self::StepStarted { run_id, .. }
            | Self::StepCompleted { run_id, .. }
            | Self::RunLogChunk { run_id, .. }
            | Self::ReleaseSkipped { run_id, .. }
            | Self::PublishStarted { run_id, .. }
            | Self::PublishCompleted { run_id, .. }
            | Self::PublishFailed { run_id, .. }
            | Self::PublishSkipped { run_id, .. }
            | Self::ReleaseCompleted { run_id, .. }
            | Self::ReleaseFailed { run_id, .. } => *run_id,
        }
    }
}
