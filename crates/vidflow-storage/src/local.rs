use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use vidflow_core::{encode_event_key, ObjectCreatedEvent, StoredObject};

/// Channel the local backend notifies on after every successful write.
pub type ObjectCreatedSender = mpsc::UnboundedSender<ObjectCreatedEvent>;

/// Local filesystem storage implementation
///
/// Objects live at `{base_path}/{bucket}/{key}`. When a notifier is attached, each
/// successful write is followed by one [`ObjectCreatedEvent`] carrying the key encoded the
/// way S3 notifications encode it.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    bucket: String,
    notifier: Option<ObjectCreatedSender>,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "./data")
    /// * `bucket` - Bucket name; becomes a directory below `base_path`
    pub async fn new(base_path: impl Into<PathBuf>, bucket: String) -> StorageResult<Self> {
        let base_path = base_path.into().join(&bucket);

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            bucket,
            notifier: None,
        })
    }

    /// Attach the object-created notification channel.
    pub fn with_notifier(mut self, notifier: ObjectCreatedSender) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Convert storage key to filesystem path with security validation
    ///
    /// This function validates that the storage key doesn't contain path traversal
    /// sequences that could escape the bucket directory.
    fn key_to_path(&self, key: &str) -> StorageResult<PathBuf> {
        if key.is_empty() || key.ends_with('/') {
            return Err(StorageError::InvalidKey(
                "Storage key must name a file".to_string(),
            ));
        }

        if key.starts_with('/') || key.split('/').any(|segment| segment == "..") {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }

        Ok(self.base_path.join(key))
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    fn notify_created(&self, key: &str) {
        let Some(notifier) = &self.notifier else {
            return;
        };
        let event = ObjectCreatedEvent::new(self.bucket.clone(), encode_event_key(key));
        if notifier.send(event).is_err() {
            tracing::warn!(
                bucket = %self.bucket,
                key = %key,
                "Object-created listener is gone; notification dropped"
            );
        }
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn put_object(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
        content_encoding: Option<&str>,
    ) -> StorageResult<StoredObject> {
        let path = self.key_to_path(key)?;
        let size = data.len() as u64;

        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            bucket = %self.bucket,
            key = %key,
            content_type = %content_type,
            content_encoding = content_encoding.unwrap_or("identity"),
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        self.notify_created(key);

        Ok(StoredObject {
            bucket: self.bucket.clone(),
            key: key.to_string(),
            content_type: content_type.to_string(),
            size_bytes: size,
        })
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }

    async fn health_check(&self) -> StorageResult<()> {
        let meta = fs::metadata(&self.base_path).await?;
        if meta.is_dir() {
            Ok(())
        } else {
            Err(StorageError::BackendError(format!(
                "{} is not a directory",
                self.base_path.display()
            )))
        }
    }
}
