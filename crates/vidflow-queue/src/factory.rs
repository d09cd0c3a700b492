use crate::memory::MemoryWorkQueue;
#[cfg(feature = "queue-sqs")]
use crate::SqsWorkQueue;
use crate::{QueueBackend, QueueResult, WorkQueue};
use std::sync::Arc;
use tokio::sync::mpsc;
use vidflow_core::{WatcherConfig, WorkMessage};

/// Create a work queue based on configuration
///
/// For the memory backend the receiving end is returned as well; the caller decides what
/// consumes it. The SQS backend returns `None`.
pub async fn create_work_queue(
    config: &WatcherConfig,
) -> QueueResult<(
    Arc<dyn WorkQueue>,
    Option<mpsc::UnboundedReceiver<WorkMessage>>,
)> {
    match config.queue_backend {
        #[cfg(feature = "queue-sqs")]
        QueueBackend::Sqs => {
            let queue = SqsWorkQueue::new(
                config.queue_url.clone(),
                config.sqs_region.clone(),
                config.sqs_endpoint.clone(),
            )
            .await?;
            tracing::info!(
                queue_url = %config.queue_url,
                region = %config.sqs_region,
                "SQS work queue initialized"
            );
            Ok((Arc::new(queue), None))
        }

        #[cfg(not(feature = "queue-sqs"))]
        QueueBackend::Sqs => Err(crate::QueueError::ConfigError(
            "SQS queue backend not available (queue-sqs feature not enabled)".to_string(),
        )),

        QueueBackend::Memory => {
            let (queue, rx) = MemoryWorkQueue::new(config.queue_url.clone());
            tracing::info!(
                queue = %config.queue_url,
                "In-memory work queue initialized"
            );
            Ok((Arc::new(queue), Some(rx)))
        }
    }
}
