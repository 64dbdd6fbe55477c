//! Mock plugins and publishers for deterministic testing.

use async_trait::async_trait;
use rk_core::engine::context::ReleaseContext;
use rk_core::plugins::base::boxed;
use rk_core::plugins::{Plugin, PluginError, PluginEvent, PluginStream};
use rk_core::publish::{PublishError, Publisher};
use rk_protocol::release_models::PublishedRelease;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A plugin that appends its name to a shared journal when it runs.
#[allow(dead_code)]
pub struct JournalPlugin {
    pub name: String,
    pub journal: Arc<Mutex<Vec<String>>>,
    pub fail: bool,
}

impl JournalPlugin {
    #[allow(dead_code)]
    pub fn new(name: &str, journal: &Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            name: name.to_string(),
            journal: journal.clone(),
            fail: false,
        }
    }

    #[allow(dead_code)]
    pub fn failing(name: &str, journal: &Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            fail: true,
            ..Self::new(name, journal)
        }
    }
}

#[async_trait]
impl Plugin for JournalPlugin {
    async fn check_availability(&self) -> bool {
        true
    }

    async fn execute(&self, _context: &ReleaseContext) -> Result<PluginStream, PluginError> {
        self.journal.lock().unwrap().push(self.name.clone());

        let name = self.name.clone();
        let fail = self.fail;
        Ok(boxed(async_stream::stream! {
            yield Ok(PluginEvent::Log(format!("{name} ran")));
            if fail {
                yield Err(PluginError::ExecutionError(format!("{name} failed")));
            } else {
                yield Ok(PluginEvent::Completed);
            }
        }))
    }
}

/// A publisher that sleeps, then succeeds or fails.
#[allow(dead_code)]
pub struct MockPublisher {
    pub target: String,
    pub delay: Duration,
    pub error: Option<String>,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl MockPublisher {
    #[allow(dead_code)]
    pub fn succeeding(target: &str, calls: &Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            target: target.to_string(),
            delay: Duration::from_millis(5),
            error: None,
            calls: calls.clone(),
        }
    }

    #[allow(dead_code)]
    pub fn failing(target: &str, error: &str, calls: &Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::succeeding(target, calls)
        }
    }
}

#[async_trait]
impl Publisher for MockPublisher {
    async fn publish(
        &self,
        _context: &ReleaseContext,
        _others: &[PublishedRelease],
    ) -> Result<PublishedRelease, PublishError> {
        self.calls.lock().unwrap().push(self.target.clone());
        tokio::time::sleep(self.delay).await;

        match &self.error {
            Some(error) => Err(PublishError::TaskFailed(error.clone())),
            None => Ok(PublishedRelease {
                target: self.target.clone(),
                name: self.target.clone(),
                url: None,
                references: Vec::new(),
            }),
        }
    }
}
