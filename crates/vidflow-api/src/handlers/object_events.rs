//! Object-created notification endpoint.
//!
//! Accepts an S3 event notification document, either posted directly or wrapped in the
//! envelope of an SNS HTTP(S) subscription (which is delivered as `text/plain`, so the
//! content type is not checked). Each notification is one watcher invocation. A 5xx tells
//! the sender the invocation failed so it redelivers the whole notification; a body that
//! is not a notification is a 400.

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::WatcherState;
use axum::{body::Bytes, extract::rejection::BytesRejection, extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;
use vidflow_core::{parse_notification, Notification, S3EventNotification};

#[derive(Debug, Serialize, ToSchema)]
pub struct IngestionSummary {
    /// Work messages published by this invocation
    pub published: usize,
    /// Events whose key was not a video or could not be decoded
    pub skipped: usize,
}

#[utoipa::path(
    post,
    path = "/events/object-created",
    tag = "ingestion",
    request_body(
        content = S3EventNotification,
        description = "S3 event notification, directly or inside an SNS envelope"
    ),
    responses(
        (status = 200, description = "Every video event was published", body = IngestionSummary),
        (status = 400, description = "Body is not an event notification", body = ErrorResponse),
        (status = 500, description = "A publish failed; redeliver", body = ErrorResponse)
    )
)]
pub async fn object_created(
    State(state): State<WatcherState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<IngestionSummary>, HttpAppError> {
    let body = body?;

    let events = match parse_notification(&body)? {
        Notification::Events(events) => events,
        Notification::Handshake {
            message_type,
            subscribe_url,
        } => {
            tracing::warn!(
                message_type = %message_type,
                subscribe_url = subscribe_url.as_deref().unwrap_or("-"),
                "SNS handshake received; confirm the subscription by visiting SubscribeURL"
            );
            return Ok(Json(IngestionSummary {
                published: 0,
                skipped: 0,
            }));
        }
    };

    let report = state.watcher.on_object_created(&events).await?;

    Ok(Json(IngestionSummary {
        published: report.published,
        skipped: report.skipped,
    }))
}
