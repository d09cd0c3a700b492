use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Work item handed to downstream processing: where the new video lives.
///
/// Serialized as a flat UTF-8 JSON document `{"bucket": ..., "key": ...}`. The key is the
/// normalized (decoded) object path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WorkMessage {
    pub bucket: String,
    pub key: String,
}

impl WorkMessage {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Message body as sent to the queue.
    pub fn to_body(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
