//! Release-run state machine logic.
//!
//! This module implements the state transitions for a release run. Each
//! transition updates the run and emits the matching events.

use chrono::Utc;
use rk_protocol::ipc::Event;
use rk_protocol::run_models::{ReleaseRun, RunStatus};
use tokio::sync::mpsc::Sender;
use uuid::Uuid;

/// Create a new pending run for `branch`.
pub fn create_run(branch: impl Into<String>) -> ReleaseRun {
    ReleaseRun {
        id: Uuid::new_v4(),
        branch: branch.into(),
        status: RunStatus::Pending,
        current_step: 0,
        logs: Vec::new(),
        started_at: Utc::now(),
        completed_at: None,
    }
}

async fn set_status(run: &mut ReleaseRun, events_tx: &Sender<Event>, status: RunStatus) {
    run.status = status;
    if status.is_terminal() {
        run.completed_at = Some(Utc::now());
    }

    let _ = events_tx
        .send(Event::RunStatusUpdate {
            run_id: run.id,
            status,
            step_index: run.current_step,
        })
        .await;
}

/// Transition the run to Running.
///
/// # Arguments
///
/// * `run` - The run to start
/// * `events_tx` - Channel to send the status update
pub async fn start_run(run: &mut ReleaseRun, events_tx: &Sender<Event>) {
    set_status(run, events_tx, RunStatus::Running).await;
}

/// Transition the run to Publishing once every pipeline step succeeded.
pub async fn begin_publishing(run: &mut ReleaseRun, events_tx: &Sender<Event>) {
    set_status(run, events_tx, RunStatus::Publishing).await;
}

/// Mark the run as skipped: no release is produced.
///
/// # Arguments
///
/// * `run` - The run to skip
/// * `events_tx` - Channel for the status update and skip events
/// * `reason` - Why no release was produced
pub async fn skip_run(run: &mut ReleaseRun, events_tx: &Sender<Event>, reason: String) {
    set_status(run, events_tx, RunStatus::Skipped).await;
    let _ = events_tx
        .send(Event::ReleaseSkipped {
            run_id: run.id,
            reason,
        })
        .await;
}

/// Mark the run as completed.
///
/// `version` is `None` for dry runs that never reached publishing.
pub async fn complete_run(run: &mut ReleaseRun, events_tx: &Sender<Event>, version: Option<String>) {
    set_status(run, events_tx, RunStatus::Completed).await;
    let _ = events_tx
        .send(Event::ReleaseCompleted {
            run_id: run.id,
            version,
        })
        .await;
}

/// Mark the run as failed.
///
/// # Arguments
///
/// * `run` - The run that failed
/// * `events_tx` - Channel for the status update and failure events
/// * `error` - Error message describing the failure
pub async fn fail_run(run: &mut ReleaseRun, events_tx: &Sender<Event>, error: String) {
    set_status(run, events_tx, RunStatus::Failed).await;
    let _ = events_tx
        .send(Event::ReleaseFailed {
            run_id: run.id,
            error,
        })
        .await;
}

/// Append a log message to the run logs and emit it.
pub async fn log_to_run(run: &mut ReleaseRun, events_tx: &Sender<Event>, message: String) {
    run.logs.push(message.clone());
    let _ = events_tx
        .send(Event::RunLogChunk {
            run_id: run.id,
            content: message,
        })
        .await;
}

/// Move to the next pipeline step.
pub fn advance_step(run: &mut ReleaseRun) {
    run.current_step += 1;
}
