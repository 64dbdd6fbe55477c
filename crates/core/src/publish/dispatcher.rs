//! Concurrent, best-effort execution of publish targets.

use crate::engine::context::ReleaseContext;
use crate::publish::{PublishError, Publisher};
use rk_protocol::ipc::Event;
use rk_protocol::release_models::PublishedRelease;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tracing::{info, warn};
use uuid::Uuid;

/// Final state of one publish target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishStatus {
    Published(PublishedRelease),
    Failed(PublishError),
    /// Not started because another target failed and fail-fast is on.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOutcome {
    pub target: String,
    pub status: PublishStatus,
}

impl PublishOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self.status, PublishStatus::Failed(_))
    }
}

/// Runs publish targets on a bounded pool of tokio tasks.
///
/// Targets run in two waves. The first wave holds every target that does
/// not list other releases; the second wave runs the rest with the
/// releases of the first wave.
#[derive(Debug, Clone)]
pub struct PublishDispatcher {
    concurrency: usize,
    fail_fast: bool,
}

impl PublishDispatcher {
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
            fail_fast: false,
        }
    }

    /// Skip targets that have not started once one target failed.
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Publish every target and return one outcome per target, in input
    /// order.
    pub async fn dispatch(
        &self,
        publishers: &[(String, Arc<dyn Publisher>)],
        context: Arc<ReleaseContext>,
        run_id: Uuid,
        events_tx: &mpsc::Sender<Event>,
    ) -> Vec<PublishOutcome> {
        let failed = Arc::new(AtomicBool::new(false));
        let mut outcomes: Vec<Option<PublishOutcome>> = vec![None; publishers.len()];

        let (late, early): (Vec<usize>, Vec<usize>) =
            (0..publishers.len()).partition(|&i| publishers[i].1.needs_other_releases());

        let first = self
            .run_wave(publishers, &early, &context, Arc::new(Vec::new()), &failed, run_id, events_tx)
            .await;

        let published: Vec<PublishedRelease> = first
            .iter()
            .filter_map(|(_, outcome)| match &outcome.status {
                PublishStatus::Published(release) => Some(release.clone()),
                _ => None,
            })
            .collect();

        let second = self
            .run_wave(publishers, &late, &context, Arc::new(published), &failed, run_id, events_tx)
            .await;

        for (index, outcome) in first.into_iter().chain(second) {
            outcomes[index] = Some(outcome);
        }

        outcomes.into_iter().flatten().collect()
    }

    #[allow(clippy::too_many_arguments)]
    async fn run_wave(
        &self,
        publishers: &[(String, Arc<dyn Publisher>)],
        indices: &[usize],
        context: &Arc<ReleaseContext>,
        others: Arc<Vec<PublishedRelease>>,
        failed: &Arc<AtomicBool>,
        run_id: Uuid,
        events_tx: &mpsc::Sender<Event>,
    ) -> Vec<(usize, PublishOutcome)> {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut handles = Vec::with_capacity(indices.len());

        for &index in indices {
            let (name, publisher) = &publishers[index];
            let name = name.clone();
            let publisher = Arc::clone(publisher);
            let semaphore = Arc::clone(&semaphore);
            let context = Arc::clone(context);
            let others = Arc::clone(&others);
            let failed = Arc::clone(failed);
            let fail_fast = self.fail_fast;
            let tx = events_tx.clone();

            let handle = tokio::spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => return PublishStatus::Failed(PublishError::TaskFailed(e.to_string())),
                };

                if fail_fast && failed.load(Ordering::SeqCst) {
                    info!(target_name = %name, "skipping publish target after an earlier failure");
                    let _ = tx
                        .send(Event::PublishSkipped {
                            run_id,
                            target: name.clone(),
                        })
                        .await;
                    return PublishStatus::Skipped;
                }

                info!(target_name = %name, "publishing");
                let _ = tx
                    .send(Event::PublishStarted {
                        run_id,
                        target: name.clone(),
                    })
                    .await;

                match publisher.publish(&context, &others).await {
                    Ok(release) => {
                        let _ = tx
                            .send(Event::PublishCompleted {
                                run_id,
                                release: release.clone(),
                            })
                            .await;
                        PublishStatus::Published(release)
                    }
                    Err(error) => {
                        failed.store(true, Ordering::SeqCst);
                        warn!(target_name = %name, %error, "publish target failed");
                        let _ = tx
                            .send(Event::PublishFailed {
                                run_id,
                                target: name.clone(),
                                error: error.to_string(),
                            })
                            .await;
                        PublishStatus::Failed(error)
                    }
                }
            });

            handles.push((index, handle));
        }

        let mut results = Vec::with_capacity(handles.len());
        for (index, handle) in handles {
            let status = match handle.await {
                Ok(status) => status,
                Err(e) => {
                    failed.store(true, Ordering::SeqCst);
                    PublishStatus::Failed(PublishError::TaskFailed(e.to_string()))
                }
            };
            results.push((
                index,
                PublishOutcome {
                    target: publishers[index].0.clone(),
                    status,
                },
            ));
        }

        results
    }
}
