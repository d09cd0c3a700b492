//! In-process pipeline wiring for single-process deployments.
//!
//! With the local storage backend, every successful write emits an object-created event on
//! a channel. Each event is one watcher invocation, run on its own task and redelivered on
//! failure. With the memory queue backend, published work messages are drained and logged
//! here since no external consumer exists.

use std::sync::Arc;

use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinHandle;
use vidflow_core::{ObjectCreatedEvent, WorkMessage};
use vidflow_queue::Redelivery;

/// Upper bound on watcher invocations in flight at once
pub const MAX_CONCURRENT_INVOCATIONS: usize = 16;

pub fn spawn_local_pipeline(
    mut events: mpsc::UnboundedReceiver<ObjectCreatedEvent>,
    redelivery: Redelivery,
) -> JoinHandle<()> {
    let semaphore = Arc::new(Semaphore::new(MAX_CONCURRENT_INVOCATIONS));

    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            let permit = match semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => break,
            };
            let redelivery = redelivery.clone();

            tokio::spawn(async move {
                let _permit = permit;
                let batch = [event];
                if let Err(e) = redelivery.deliver(&batch).await {
                    tracing::error!(
                        bucket = %batch[0].bucket,
                        key = %batch[0].key,
                        error = %e,
                        "Object-created event dropped after redelivery attempts"
                    );
                }
            });
        }
        tracing::info!("Object-created channel closed, local pipeline stopped");
    })
}

pub fn spawn_work_message_drain(
    mut messages: mpsc::UnboundedReceiver<WorkMessage>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(message) = messages.recv().await {
            tracing::info!(
                bucket = %message.bucket,
                key = %message.key,
                "Work message received by in-memory consumer"
            );
        }
    })
}
