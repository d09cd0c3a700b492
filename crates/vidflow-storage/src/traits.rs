//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use thiserror::Error;
use vidflow_core::StoredObject;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// Every backend is bound to a single bucket (the storage destination). Writes to an
/// existing key overwrite it, which makes a retried upload idempotent.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write `data` under `key` and describe the stored object.
    ///
    /// `content_encoding` is recorded as object metadata only; `data` is persisted as given.
    async fn put_object(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
        content_encoding: Option<&str>,
    ) -> StorageResult<StoredObject>;

    /// The bucket (storage destination identifier) this backend writes to
    fn bucket(&self) -> &str;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;

    /// Cheap reachability probe used by the readiness endpoint
    async fn health_check(&self) -> StorageResult<()>;
}
