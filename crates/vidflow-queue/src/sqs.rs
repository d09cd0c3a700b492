use crate::traits::{QueueError, QueueResult, WorkQueue};
use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_config::retry::{RetryConfig, RetryMode};
use aws_config::BehaviorVersion;
use aws_sdk_sqs::error::DisplayErrorContext;
use aws_sdk_sqs::types::QueueAttributeName;
use aws_sdk_sqs::Client;
use vidflow_core::{QueueBackend, WorkMessage};

/// SQS work queue
#[derive(Clone)]
pub struct SqsWorkQueue {
    client: Client,
    queue_url: String,
}

impl SqsWorkQueue {
    /// Create a new SqsWorkQueue
    ///
    /// # Arguments
    /// * `queue_url` - Full SQS queue URL messages are sent to
    /// * `region` - AWS region of the queue
    /// * `endpoint_url` - Optional custom endpoint (e.g., "http://localhost:4566" for LocalStack)
    pub async fn new(
        queue_url: String,
        region: String,
        endpoint_url: Option<String>,
    ) -> QueueResult<Self> {
        if queue_url.trim().is_empty() {
            return Err(QueueError::ConfigError(
                "queue URL must not be empty".to_string(),
            ));
        }

        let region_provider = RegionProviderChain::first_try(aws_config::Region::new(region));

        let retry_config = RetryConfig::standard()
            .with_max_attempts(3)
            .with_retry_mode(RetryMode::Standard);

        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(region_provider)
            .retry_config(retry_config)
            .load()
            .await;

        let mut sqs_config = aws_sdk_sqs::config::Builder::from(&config);
        if let Some(ref endpoint) = endpoint_url {
            sqs_config = sqs_config.endpoint_url(endpoint);
        }
        let client = Client::from_conf(sqs_config.build());

        Ok(SqsWorkQueue { client, queue_url })
    }
}

#[async_trait]
impl WorkQueue for SqsWorkQueue {
    async fn publish(&self, message: &WorkMessage) -> QueueResult<()> {
        let body = message.to_body()?;
        let start = std::time::Instant::now();

        let output = self
            .client
            .send_message()
            .queue_url(&self.queue_url)
            .message_body(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %DisplayErrorContext(&e),
                    queue_url = %self.queue_url,
                    bucket = %message.bucket,
                    key = %message.key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "SQS send_message failed"
                );
                QueueError::PublishFailed(DisplayErrorContext(&e).to_string())
            })?;

        tracing::debug!(
            queue_url = %self.queue_url,
            message_id = output.message_id().unwrap_or_default(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "SQS message sent"
        );

        Ok(())
    }

    fn destination(&self) -> &str {
        &self.queue_url
    }

    fn backend_type(&self) -> QueueBackend {
        QueueBackend::Sqs
    }

    async fn health_check(&self) -> QueueResult<()> {
        self.client
            .get_queue_attributes()
            .queue_url(&self.queue_url)
            .attribute_names(QueueAttributeName::QueueArn)
            .send()
            .await
            .map(|_| ())
            .map_err(|e| QueueError::BackendError(DisplayErrorContext(&e).to_string()))
    }
}
