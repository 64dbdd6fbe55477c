//! Event assertion helpers.

use rk_protocol::ipc::Event;
use rk_protocol::run_models::RunStatus;
use tokio::sync::mpsc;

/// Drain every event left in the channel. The sender side must be dropped.
#[allow(dead_code)]
pub async fn drain(mut rx: mpsc::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    events
}

/// Plugin names from `StepStarted` events, in order.
#[allow(dead_code)]
pub fn started_steps(events: &[Event]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::StepStarted { plugin, .. } => Some(plugin.clone()),
            _ => None,
        })
        .collect()
}

/// Whether the events contain a status update to `status`.
#[allow(dead_code)]
pub fn has_status_update(events: &[Event], status: RunStatus) -> bool {
    events
        .iter()
        .any(|e| matches!(e, Event::RunStatusUpdate { status: s, .. } if *s == status))
}

/// Assert the run opened with `ReleaseStarted`, ended with a terminal
/// event, and every event belongs to the same run.
#[allow(dead_code)]
pub fn assert_event_sequence(events: &[Event]) {
    let first = events.first().expect("event sequence is empty");
    assert!(
        matches!(first, Event::ReleaseStarted { .. }),
        "First event should be ReleaseStarted, got: {first:?}"
    );

    let last = events.last().expect("event sequence is empty");
    assert!(
        matches!(
            last,
            Event::ReleaseCompleted { .. } | Event::ReleaseSkipped { .. } | Event::ReleaseFailed { .. }
        ),
        "Last event should be terminal, got: {last:?}"
    );

    let run_id = first.run_id();
    assert!(events.iter().all(|e| e.run_id() == run_id));
}
