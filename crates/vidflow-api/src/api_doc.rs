//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use vidflow_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Vidflow API",
        version = "0.1.0",
        description = "Video ingestion pipeline: uploads land in the object store and \
                       .mp4 object-created notifications become work messages."
    ),
    paths(
        handlers::video_upload::upload_video,
        handlers::object_events::object_created,
    ),
    components(
        schemas(
            models::UploadRequest,
            models::UploadResponse,
            models::S3EventNotification,
            models::S3EventRecord,
            handlers::object_events::IngestionSummary,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "videos", description = "Video upload gateway"),
        (name = "ingestion", description = "Object-created notifications")
    )
)]
pub struct ApiDoc;
