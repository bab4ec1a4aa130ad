//! Task-queue consumer running ingestion with bounded concurrency.

use super::{IngestionService, IngestionServiceError, IngestionServiceResult};
use crate::cancellation::CancellationExt;
use crate::config::IngestionWorkerConfig;
use crate::workspace::{
    adapters::queue::IngestionTaskReceiver, domain::IngestionTask, ports::ClientDatabase,
};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Pulls ingestion tasks and runs them against the client database.
#[derive(Clone)]
pub struct IngestionWorker {
    service: IngestionService,
    client_database: Arc<dyn ClientDatabase>,
    config: IngestionWorkerConfig,
}

impl IngestionWorker {
    /// Creates a worker.
    #[must_use]
    pub const fn new(
        service: IngestionService,
        client_database: Arc<dyn ClientDatabase>,
        config: IngestionWorkerConfig,
    ) -> Self {
        Self {
            service,
            client_database,
            config,
        }
    }

    /// Extracts the task's schema and ingests it.
    ///
    /// Connection and extraction failures are recorded as the tenant's
    /// `ERROR` status (best effort) before being returned.
    ///
    /// # Errors
    ///
    /// Returns [`IngestionServiceError`] when the client database cannot be
    /// read, ingestion fails, or `cancel` fires.
    pub async fn process(
        &self,
        cancel: &CancellationToken,
        task: IngestionTask,
    ) -> IngestionServiceResult<usize> {
        let IngestionTask { tenant_id, db_url } = task;

        let connection = match cancel.guard(self.client_database.connect(&db_url)).await? {
            Ok(connection) => connection,
            Err(err) => return Err(self.service.record_failure(&tenant_id, err.into()).await),
        };
        let extracted = cancel.guard(connection.database_metadata()).await;
        if let Err(close_err) = connection.close().await {
            warn!(tenant_id = %tenant_id, error = %close_err, "failed to close client database session");
        }
        let metadata = match extracted? {
            Ok(metadata) => metadata.with_tenant_id(tenant_id.clone()),
            Err(err) => return Err(self.service.record_failure(&tenant_id, err.into()).await),
        };

        self.service.vectorize_and_store(cancel, &metadata).await
    }

    /// Consumes tasks until `cancel` fires or every producer is gone.
    ///
    /// At most `concurrency` tasks run at once. In-flight tasks observe the
    /// same token and are awaited before returning.
    pub async fn run(&self, cancel: CancellationToken, mut receiver: IngestionTaskReceiver) {
        let permits = Arc::new(Semaphore::new(self.config.concurrency.max(1)));
        let mut in_flight = JoinSet::new();
        info!(concurrency = self.config.concurrency, "ingestion worker started");

        loop {
            let Ok(acquired) = cancel.guard(Arc::clone(&permits).acquire_owned()).await else {
                break;
            };
            let Ok(permit) = acquired else {
                break;
            };
            let next = tokio::select! {
                biased;
                () = cancel.cancelled() => None,
                task = receiver.recv() => task,
            };
            let Some(task) = next else {
                break;
            };

            let worker = self.clone();
            let token = cancel.clone();
            in_flight.spawn(async move {
                let _permit = permit;
                let tenant_id = task.tenant_id.clone();
                match worker.process(&token, task).await {
                    Ok(vectors) => info!(tenant_id = %tenant_id, vectors, "ingestion task completed"),
                    Err(IngestionServiceError::Cancelled(_)) => {
                        warn!(tenant_id = %tenant_id, "ingestion task cancelled");
                    }
                    Err(err) => error!(tenant_id = %tenant_id, error = %err, "ingestion task failed"),
                }
            });

            while let Some(joined) = in_flight.try_join_next() {
                log_join(joined);
            }
        }

        while let Some(joined) = in_flight.join_next().await {
            log_join(joined);
        }
        info!("ingestion worker stopped");
    }
}

fn log_join(result: Result<(), tokio::task::JoinError>) {
    if let Err(err) = result {
        error!(error = %err, "ingestion task aborted");
    }
}
