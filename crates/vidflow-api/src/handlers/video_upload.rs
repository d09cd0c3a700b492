use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::GatewayState;
use axum::{extract::State, Json};
use vidflow_core::constants::{
    UPLOAD_CONTENT_ENCODING, UPLOAD_SUCCESS_MESSAGE, VIDEO_CONTENT_TYPE,
};
use vidflow_core::{UploadRequest, UploadResponse};

#[utoipa::path(
    post,
    path = "/videos",
    tag = "videos",
    request_body = UploadRequest,
    responses(
        (status = 200, description = "Video stored", body = UploadResponse),
        (status = 400, description = "Missing fields or invalid base64", body = ErrorResponse),
        (status = 413, description = "Request body too large", body = ErrorResponse),
        (status = 500, description = "Object store write failed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request))]
pub async fn upload_video(
    State(state): State<GatewayState>,
    ValidatedJson(request): ValidatedJson<UploadRequest>,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let upload = request.validate()?;
    let file_name = upload.file_name;

    let stored = state
        .storage
        .put_object(
            &file_name,
            upload.content,
            VIDEO_CONTENT_TYPE,
            Some(UPLOAD_CONTENT_ENCODING),
        )
        .await
        .map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %state.storage.bucket(),
                key = %file_name,
                "Failed to store uploaded video"
            );
            HttpAppError::from(e)
        })?;

    tracing::info!(
        bucket = %stored.bucket,
        key = %stored.key,
        size_bytes = stored.size_bytes,
        "Video uploaded successfully"
    );

    Ok(Json(UploadResponse {
        message: UPLOAD_SUCCESS_MESSAGE.to_string(),
    }))
}
