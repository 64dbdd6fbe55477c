//! Runtime release-run state models.
//!
//! This module defines the structures for tracking the state of a single
//! release execution.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents the current lifecycle status of a release run.
///
/// The status progresses through these states during normal execution:
/// Pending -> Running -> Publishing -> Completed
///
/// Special states:
/// - Skipped: the branch is not configured or nothing warrants a release
/// - Failed: a pipeline step failed
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    /// Run has been created but not started yet.
    Pending,

    /// Pipeline steps are executing.
    Running,

    /// Pipeline succeeded; publish targets are running.
    Publishing,

    /// No release was produced.
    Skipped,

    /// Run has finished. Individual publish targets may still have failed.
    Completed,

    /// A pipeline step failed; nothing was published.
    Failed,
}

impl RunStatus {
    /// Whether the run can no longer change state.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Skipped | Self::Completed | Self::Failed)
    }
}

/// Represents the runtime state of a single release execution.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ReleaseRun {
    /// Unique identifier for this run.
    pub id: Uuid,

    /// Branch the release runs on.
    pub branch: String,

    /// Current execution status.
    pub status: RunStatus,

    /// Zero-based index of the pipeline step currently executing.
    pub current_step: usize,

    /// Accumulated log messages.
    pub logs: Vec<String>,

    /// When the run was created.
    pub started_at: DateTime<Utc>,

    /// When the run reached a terminal state.
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}
