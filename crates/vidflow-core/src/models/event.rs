use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// `Event` value of the document S3 sends when a notification target is configured.
pub const S3_TEST_EVENT: &str = "s3:TestEvent";

const SNS_NOTIFICATION: &str = "Notification";
const SNS_SUBSCRIPTION_CONFIRMATION: &str = "SubscriptionConfirmation";
const SNS_UNSUBSCRIBE_CONFIRMATION: &str = "UnsubscribeConfirmation";

/// One object-created notification: the bucket and the key exactly as delivered
/// (transport encoded; see [`crate::keys::normalize_object_key`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectCreatedEvent {
    pub bucket: String,
    pub key: String,
}

impl ObjectCreatedEvent {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}

/// S3 event notification document, reduced to the fields the watcher reads.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct S3EventNotification {
    #[serde(rename = "Records", default)]
    pub records: Option<Vec<S3EventRecord>>,
    /// Only set on the S3 test event
    #[serde(rename = "Event", default)]
    pub event: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct S3EventRecord {
    #[serde(rename = "eventName", default)]
    pub event_name: Option<String>,
    pub s3: S3Entity,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct S3Entity {
    pub bucket: S3Bucket,
    pub object: S3Object,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct S3Bucket {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct S3Object {
    pub key: String,
    #[serde(default)]
    pub size: Option<u64>,
}

/// Why a notification body cannot be turned into an event batch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotificationError {
    #[error("notification is not valid JSON: {0}")]
    Malformed(String),

    #[error("notification has no Records")]
    MissingRecords,

    #[error("SNS notification has no Message")]
    EmptyEnvelope,

    #[error("unsupported SNS message type '{0}'")]
    UnsupportedType(String),
}

/// A parsed notification body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Events for one watcher invocation. Empty for the S3 test event.
    Events(Vec<ObjectCreatedEvent>),
    /// SNS subscription handshake. It carries no events; the subscription is confirmed
    /// by fetching `subscribe_url`.
    Handshake {
        message_type: String,
        subscribe_url: Option<String>,
    },
}

/// SNS HTTP(S) delivery envelope. The S3 document travels as a JSON string in `Message`.
#[derive(Debug, Deserialize)]
struct SnsEnvelope {
    #[serde(rename = "Type")]
    message_type: String,
    #[serde(rename = "Message", default)]
    message: Option<String>,
    #[serde(rename = "SubscribeURL", default)]
    subscribe_url: Option<String>,
}

impl S3EventRecord {
    /// Records without an event name are treated as creations; anything else
    /// (removals, restores) is not ours to handle.
    pub fn is_object_created(&self) -> bool {
        self.event_name
            .as_deref()
            .map_or(true, |name| name.starts_with("ObjectCreated"))
    }
}

impl S3EventNotification {
    /// Flatten the notification into the watcher's event batch.
    ///
    /// A document without `Records` is only accepted when it is the S3 test event.
    pub fn into_events(self) -> Result<Vec<ObjectCreatedEvent>, NotificationError> {
        let records = match self.records {
            Some(records) => records,
            None if self.event.as_deref() == Some(S3_TEST_EVENT) => return Ok(Vec::new()),
            None => return Err(NotificationError::MissingRecords),
        };

        Ok(records
            .into_iter()
            .filter(S3EventRecord::is_object_created)
            .map(|record| ObjectCreatedEvent::new(record.s3.bucket.name, record.s3.object.key))
            .collect())
    }
}

/// Parse a notification body, either an S3 document or one wrapped in an SNS envelope.
pub fn parse_notification(body: &[u8]) -> Result<Notification, NotificationError> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|e| NotificationError::Malformed(e.to_string()))?;

    let is_envelope = value.get("Type").is_some() && value.get("Records").is_none();
    if !is_envelope {
        return s3_events(value).map(Notification::Events);
    }

    let envelope: SnsEnvelope =
        serde_json::from_value(value).map_err(|e| NotificationError::Malformed(e.to_string()))?;

    match envelope.message_type.as_str() {
        SNS_NOTIFICATION => {
            let message = envelope
                .message
                .filter(|m| !m.trim().is_empty())
                .ok_or(NotificationError::EmptyEnvelope)?;
            let inner: serde_json::Value = serde_json::from_str(&message)
                .map_err(|e| NotificationError::Malformed(e.to_string()))?;
            s3_events(inner).map(Notification::Events)
        }
        SNS_SUBSCRIPTION_CONFIRMATION | SNS_UNSUBSCRIBE_CONFIRMATION => {
            Ok(Notification::Handshake {
                message_type: envelope.message_type,
                subscribe_url: envelope.subscribe_url,
            })
        }
        other => Err(NotificationError::UnsupportedType(other.to_string())),
    }
}

fn s3_events(value: serde_json::Value) -> Result<Vec<ObjectCreatedEvent>, NotificationError> {
    let notification: S3EventNotification =
        serde_json::from_value(value).map_err(|e| NotificationError::Malformed(e.to_string()))?;
    notification.into_events()
}
