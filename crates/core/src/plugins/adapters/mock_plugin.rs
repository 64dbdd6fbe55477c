//! Mock plugin implementation for testing.

use crate::engine::context::ReleaseContext;
use crate::plugins::base::{boxed, Plugin, PluginError, PluginEvent, PluginStream};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Clone)]
pub struct MockPlugin {
    available: bool,
    events: Vec<Result<PluginEvent, PluginError>>,
    executions: Arc<AtomicUsize>,
}

impl MockPlugin {
    pub fn new(available: bool, events: Vec<Result<PluginEvent, PluginError>>) -> Self {
        Self {
            available,
            events,
            executions: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn success() -> Self {
        Self::new(
            true,
            vec![
                Ok(PluginEvent::Log("Mock plugin running".to_string())),
                Ok(PluginEvent::Completed),
            ],
        )
    }

    pub fn unavailable() -> Self {
        Self::new(false, vec![])
    }

    pub fn failing() -> Self {
        Self::new(
            true,
            vec![
                Ok(PluginEvent::Log("Starting...".to_string())),
                Err(PluginError::ExecutionError("Mock failure".to_string())),
            ],
        )
    }

    /// How many times `execute` was called, across clones.
    pub fn executions(&self) -> usize {
        self.executions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Plugin for MockPlugin {
    async fn check_availability(&self) -> bool {
        self.available
    }

    async fn execute(&self, _context: &ReleaseContext) -> Result<PluginStream, PluginError> {
        if !self.available {
            return Err(PluginError::NotAvailable("Mock plugin not available".to_string()));
        }

        self.executions.fetch_add(1, Ordering::SeqCst);
        Ok(boxed(tokio_stream::iter(self.events.clone())))
    }
}
