//! Vidflow Storage Library
//!
//! This crate provides the object store abstraction the upload gateway writes through,
//! with an S3 backend and a local filesystem backend for development.
//!
//! Object creation notifications are not part of the write path: S3 delivers them through
//! its own event notifications, and the local backend pushes an
//! [`ObjectCreatedEvent`](vidflow_core::ObjectCreatedEvent) onto a channel after each write.

pub mod factory;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::{LocalStorage, ObjectCreatedSender};
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
pub use vidflow_core::StorageBackend;
