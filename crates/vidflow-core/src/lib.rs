//! Vidflow Core Library
//!
//! This crate provides the domain models, error types, configuration, and object key
//! handling shared by the upload gateway, the ingestion watcher, and their adapters.

pub mod config;
pub mod constants;
pub mod error;
pub mod keys;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, Config, GatewayConfig, LogFormat, ServiceRole, WatcherConfig};
pub use error::{AppError, ConfigError, ErrorMetadata, LogLevel};
pub use keys::{encode_event_key, is_video_key, normalize_object_key, KeyDecodeError};
pub use models::{
    parse_notification, Notification, NotificationError, ObjectCreatedEvent,
    S3EventNotification, StoredObject, UploadRequest, UploadResponse, ValidatedUpload,
    WorkMessage,
};
pub use storage_types::{QueueBackend, StorageBackend};
