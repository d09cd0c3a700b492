#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-s3")]
use crate::S3Storage;
use crate::{Storage, StorageBackend, StorageError, StorageResult};
use std::sync::Arc;
use tokio::sync::mpsc;
use vidflow_core::{GatewayConfig, ObjectCreatedEvent};

/// Create a storage backend based on configuration
///
/// `notifier` is only used by the local backend; S3 delivers object-created notifications
/// through its own bucket notification configuration.
pub async fn create_storage(
    config: &GatewayConfig,
    notifier: Option<mpsc::UnboundedSender<ObjectCreatedEvent>>,
) -> StorageResult<Arc<dyn Storage>> {
    match config.storage_backend {
        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => {
            if notifier.is_some() {
                tracing::debug!("S3 backend ignores the in-process notifier");
            }
            let storage = S3Storage::new(
                config.bucket_name.clone(),
                config.s3_region.clone(),
                config.s3_endpoint.clone(),
            )
            .await?;
            tracing::info!(
                bucket = %config.bucket_name,
                region = %config.s3_region,
                endpoint = config.s3_endpoint.as_deref().unwrap_or("aws"),
                "S3 storage initialized"
            );
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageBackend::S3 => Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let mut storage =
                LocalStorage::new(&config.local_storage_path, config.bucket_name.clone()).await?;
            if let Some(tx) = notifier {
                storage = storage.with_notifier(tx);
            }
            tracing::info!(
                bucket = %config.bucket_name,
                path = %config.local_storage_path,
                "Local storage initialized"
            );
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}

#[cfg(all(test, feature = "storage-local"))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_local_backend_with_notifier() {
        let dir = tempfile::tempdir().unwrap();
        let config = GatewayConfig {
            bucket_name: "videos".to_string(),
            storage_backend: StorageBackend::Local,
            s3_region: "us-east-1".to_string(),
            s3_endpoint: None,
            local_storage_path: dir.path().to_string_lossy().to_string(),
        };
        let (tx, mut rx) = mpsc::unbounded_channel();

        let storage = create_storage(&config, Some(tx)).await.unwrap();
        assert_eq!(storage.backend_type(), StorageBackend::Local);
        assert_eq!(storage.bucket(), "videos");

        storage
            .put_object("a.mp4", b"x".to_vec(), "video/mp4", None)
            .await
            .unwrap();
        assert_eq!(rx.recv().await.unwrap().key, "a.mp4");
    }
}
