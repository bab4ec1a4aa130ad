//! In-process ingestion queue over a bounded tokio channel.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::workspace::{
    domain::IngestionTask,
    ports::{TaskQueue, TaskQueueError},
};

/// Producer half of the in-process ingestion queue.
#[derive(Debug, Clone)]
pub struct ChannelTaskQueue {
    sender: mpsc::Sender<IngestionTask>,
}

/// Consumer half of the in-process ingestion queue.
#[derive(Debug)]
pub struct IngestionTaskReceiver {
    receiver: mpsc::Receiver<IngestionTask>,
}

impl ChannelTaskQueue {
    /// Creates a queue buffering up to `capacity` tasks (minimum one).
    #[must_use]
    pub fn new(capacity: usize) -> (Self, IngestionTaskReceiver) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, IngestionTaskReceiver { receiver })
    }
}

impl IngestionTaskReceiver {
    /// Waits for the next task; `None` once every producer is dropped.
    pub async fn recv(&mut self) -> Option<IngestionTask> {
        self.receiver.recv().await
    }

    /// Stops accepting tasks while leaving buffered ones receivable.
    pub fn close(&mut self) {
        self.receiver.close();
    }
}

#[async_trait]
impl TaskQueue for ChannelTaskQueue {
    async fn enqueue_ingestion(&self, task: IngestionTask) -> Result<(), TaskQueueError> {
        self.sender
            .send(task)
            .await
            .map_err(|_| TaskQueueError::Closed)
    }
}
