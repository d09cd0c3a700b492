//! Domain models for the ingestion pipeline.

pub mod event;
pub mod upload;
pub mod work_message;

pub use event::{
    parse_notification, Notification, NotificationError, ObjectCreatedEvent, S3EventNotification,
    S3EventRecord,
};
pub use upload::{StoredObject, UploadRequest, UploadResponse, ValidatedUpload};
pub use work_message::WorkMessage;
