//! At-least-once redelivery of object-created batches.
//!
//! When the store notifies in process there is no platform to redeliver a failed
//! invocation, so this loop plays that role: a batch whose invocation fails is handed to
//! the watcher again after an exponential backoff, until it succeeds or the attempt budget
//! is spent.

use std::time::Duration;

use tokio::time::sleep;
use vidflow_core::ObjectCreatedEvent;

use crate::watcher::{IngestionReport, IngestionWatcher, WatcherError};

/// Maximum delay before redelivering a failed batch. Caps exponential backoff
/// so that high attempt counts do not produce excessively long delays.
pub const MAX_REDELIVERY_BACKOFF: Duration = Duration::from_secs(300);

#[derive(Debug, Clone)]
pub struct RedeliveryPolicy {
    /// Total invocations per batch, including the first one
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RedeliveryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(1),
            max_delay: MAX_REDELIVERY_BACKOFF,
        }
    }
}

impl RedeliveryPolicy {
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Self::default()
        }
    }

    /// Delay before redelivery number `retry` (0-based): `base * 2^retry`, capped.
    #[inline]
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 2_u32.saturating_pow(retry.min(31));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

#[derive(Clone)]
pub struct Redelivery {
    watcher: IngestionWatcher,
    policy: RedeliveryPolicy,
}

impl Redelivery {
    pub fn new(watcher: IngestionWatcher, policy: RedeliveryPolicy) -> Self {
        Self { watcher, policy }
    }

    /// Invoke the watcher for `events`, redelivering on failure.
    ///
    /// Returns the last error once `max_attempts` invocations have failed.
    pub async fn deliver(
        &self,
        events: &[ObjectCreatedEvent],
    ) -> Result<IngestionReport, WatcherError> {
        let mut attempt = 1u32;
        loop {
            match self.watcher.on_object_created(events).await {
                Ok(report) => {
                    if attempt > 1 {
                        tracing::info!(attempt, "Batch succeeded after redelivery");
                    }
                    return Ok(report);
                }
                Err(e) if attempt < self.policy.max_attempts => {
                    let delay = self.policy.backoff(attempt - 1);
                    tracing::warn!(
                        error = %e,
                        attempt,
                        max_attempts = self.policy.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        "Watcher invocation failed, redelivering batch"
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        attempt,
                        batch_size = events.len(),
                        "Watcher invocation failed, giving up on batch"
                    );
                    return Err(e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{QueueError, QueueResult, WorkQueue};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use vidflow_core::{QueueBackend, WorkMessage};

    /// Fails the first `failures` publishes, then records.
    struct FlakyQueue {
        failures: AtomicUsize,
        calls: AtomicUsize,
        published: Mutex<Vec<WorkMessage>>,
    }

    impl FlakyQueue {
        fn new(failures: usize) -> Arc<Self> {
            Arc::new(Self {
                failures: AtomicUsize::new(failures),
                calls: AtomicUsize::new(0),
                published: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl WorkQueue for FlakyQueue {
        async fn publish(&self, message: &WorkMessage) -> QueueResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let remaining = self.failures.load(Ordering::SeqCst);
            if remaining > 0 {
                self.failures.store(remaining - 1, Ordering::SeqCst);
                return Err(QueueError::PublishFailed("connection reset".to_string()));
            }
            self.published.lock().unwrap().push(message.clone());
            Ok(())
        }

        fn destination(&self) -> &str {
            "flaky"
        }

        fn backend_type(&self) -> QueueBackend {
            QueueBackend::Memory
        }

        async fn health_check(&self) -> QueueResult<()> {
            Ok(())
        }
    }

    fn fast_policy(max_attempts: u32) -> RedeliveryPolicy {
        RedeliveryPolicy {
            max_attempts,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
        }
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = RedeliveryPolicy::default();
        assert_eq!(policy.backoff(0), Duration::from_secs(1));
        assert_eq!(policy.backoff(1), Duration::from_secs(2));
        assert_eq!(policy.backoff(4), Duration::from_secs(16));
        assert_eq!(policy.backoff(9), Duration::from_secs(300));
        assert_eq!(policy.backoff(40), Duration::from_secs(300));
    }

    #[test]
    fn at_least_one_attempt() {
        assert_eq!(RedeliveryPolicy::with_max_attempts(0).max_attempts, 1);
    }

    #[tokio::test]
    async fn transient_failure_ends_in_one_successful_publish() {
        let queue = FlakyQueue::new(1);
        let redelivery = Redelivery::new(
            IngestionWatcher::new(queue.clone() as Arc<dyn WorkQueue>),
            fast_policy(3),
        );

        let report = redelivery
            .deliver(&[ObjectCreatedEvent::new("videos", "a.mp4")])
            .await
            .unwrap();

        assert_eq!(report.published, 1);
        assert_eq!(queue.calls.load(Ordering::SeqCst), 2);
        assert_eq!(
            *queue.published.lock().unwrap(),
            vec![WorkMessage::new("videos", "a.mp4")]
        );
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let queue = FlakyQueue::new(10);
        let redelivery = Redelivery::new(
            IngestionWatcher::new(queue.clone() as Arc<dyn WorkQueue>),
            fast_policy(3),
        );

        let result = redelivery
            .deliver(&[ObjectCreatedEvent::new("videos", "a.mp4")])
            .await;

        assert!(result.is_err());
        assert_eq!(queue.calls.load(Ordering::SeqCst), 3);
        assert!(queue.published.lock().unwrap().is_empty());
    }
}
