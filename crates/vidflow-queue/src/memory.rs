//! In-process work queue backed by an unbounded tokio channel.
//!
//! Used for local development (a drain task stands in for the downstream consumer) and in
//! tests. Publishing fails once the receiving side has been dropped.

use crate::traits::{QueueError, QueueResult, WorkQueue};
use async_trait::async_trait;
use tokio::sync::mpsc;
use vidflow_core::{QueueBackend, WorkMessage};

pub struct MemoryWorkQueue {
    destination: String,
    tx: mpsc::UnboundedSender<WorkMessage>,
}

impl MemoryWorkQueue {
    /// Create the queue and the receiver its messages are delivered to.
    pub fn new(destination: impl Into<String>) -> (Self, mpsc::UnboundedReceiver<WorkMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                destination: destination.into(),
                tx,
            },
            rx,
        )
    }
}

#[async_trait]
impl WorkQueue for MemoryWorkQueue {
    async fn publish(&self, message: &WorkMessage) -> QueueResult<()> {
        self.tx.send(message.clone()).map_err(|_| {
            QueueError::PublishFailed(format!("queue '{}' has no consumer", self.destination))
        })
    }

    fn destination(&self) -> &str {
        &self.destination
    }

    fn backend_type(&self) -> QueueBackend {
        QueueBackend::Memory
    }

    async fn health_check(&self) -> QueueResult<()> {
        if self.tx.is_closed() {
            Err(QueueError::BackendError(format!(
                "queue '{}' has no consumer",
                self.destination
            )))
        } else {
            Ok(())
        }
    }
}
