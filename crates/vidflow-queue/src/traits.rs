//! Work queue abstraction trait

use async_trait::async_trait;
use thiserror::Error;
use vidflow_core::{QueueBackend, WorkMessage};

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("Publish failed: {0}")]
    PublishFailed(String),

    #[error("Message serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Queue backend error: {0}")]
    BackendError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type QueueResult<T> = Result<T, QueueError>;

/// At-least-once message queue the watcher publishes work messages to.
///
/// Once `publish` returns `Ok`, delivery is the queue's responsibility.
#[async_trait]
pub trait WorkQueue: Send + Sync {
    async fn publish(&self, message: &WorkMessage) -> QueueResult<()>;

    /// Queue destination identifier (the SQS queue URL for the SQS backend)
    fn destination(&self) -> &str;

    fn backend_type(&self) -> QueueBackend;

    /// Cheap reachability probe used by the readiness endpoint
    async fn health_check(&self) -> QueueResult<()>;
}
