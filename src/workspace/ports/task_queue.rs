//! Port for dispatching ingestion jobs.

use crate::workspace::domain::IngestionTask;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Queue consumed by ingestion workers.
///
/// Delivery is at-least-once; consumers must tolerate duplicates.
#[async_trait]
pub trait TaskQueue: Send + Sync {
    /// Enqueues a re-ingestion job.
    async fn enqueue_ingestion(&self, task: IngestionTask) -> Result<(), TaskQueueError>;
}

/// Errors returned by task queue implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskQueueError {
    /// No consumer is listening any more.
    #[error("ingestion task queue is closed")]
    Closed,

    /// Broker failure.
    #[error("task queue backend error: {0}")]
    Backend(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskQueueError {
    /// Wraps a broker failure.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Arc::new(err))
    }
}
