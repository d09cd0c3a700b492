//! Ingestion watcher: object-created events in, work messages out.
//!
//! Each invocation handles one batch (zero or more events) as delivered by the store's
//! notification mechanism. Every event is handled independently: its key is normalized,
//! non-video keys are skipped, and each video key produces exactly one publish. If any
//! publish fails the whole invocation fails, after every qualifying event in the batch
//! has been attempted, so that redelivery of the batch retries it.

use std::sync::Arc;

use thiserror::Error;
use vidflow_core::{is_video_key, normalize_object_key, ObjectCreatedEvent, WorkMessage};

use crate::traits::{QueueError, WorkQueue};

/// Outcome of a successful invocation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestionReport {
    pub published: usize,
    pub skipped: usize,
}

#[derive(Debug, Error)]
pub enum WatcherError {
    #[error("{failed} of {attempted} work message publishes failed; first error: {source}")]
    PublishFailed {
        failed: usize,
        attempted: usize,
        #[source]
        source: QueueError,
    },
}

#[derive(Clone)]
pub struct IngestionWatcher {
    queue: Arc<dyn WorkQueue>,
}

impl IngestionWatcher {
    pub fn new(queue: Arc<dyn WorkQueue>) -> Self {
        Self { queue }
    }

    pub fn queue(&self) -> &Arc<dyn WorkQueue> {
        &self.queue
    }

    /// Build the work message for one event, or `None` when the event is not ours.
    pub fn work_message_for(event: &ObjectCreatedEvent) -> Option<WorkMessage> {
        let key = match normalize_object_key(&event.key) {
            Ok(key) => key,
            Err(e) => {
                // A key that cannot be decoded will not decode on redelivery either.
                tracing::warn!(
                    bucket = %event.bucket,
                    error = %e,
                    "Skipping undecodable object key"
                );
                return None;
            }
        };

        if !is_video_key(&key) {
            tracing::debug!(bucket = %event.bucket, key = %key, "Skipping non-video object");
            return None;
        }

        Some(WorkMessage::new(event.bucket.clone(), key))
    }

    #[tracing::instrument(
        skip(self, events),
        fields(batch_size = events.len(), queue = %self.queue.destination())
    )]
    pub async fn on_object_created(
        &self,
        events: &[ObjectCreatedEvent],
    ) -> Result<IngestionReport, WatcherError> {
        let mut report = IngestionReport::default();
        let mut attempted = 0usize;
        let mut failures: Vec<QueueError> = Vec::new();

        for event in events {
            let Some(message) = Self::work_message_for(event) else {
                report.skipped += 1;
                continue;
            };

            attempted += 1;
            match self.queue.publish(&message).await {
                Ok(()) => {
                    report.published += 1;
                    tracing::info!(
                        bucket = %message.bucket,
                        key = %message.key,
                        "Work message published"
                    );
                }
                Err(e) => {
                    tracing::error!(
                        bucket = %message.bucket,
                        key = %message.key,
                        error = %e,
                        "Failed to publish work message"
                    );
                    failures.push(e);
                }
            }
        }

        let failed = failures.len();
        match failures.into_iter().next() {
            Some(source) => Err(WatcherError::PublishFailed {
                failed,
                attempted,
                source,
            }),
            None => Ok(report),
        }
    }
}
