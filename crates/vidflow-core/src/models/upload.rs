use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::constants::{INVALID_BASE64_MESSAGE, UPLOAD_FIELDS_REQUIRED_MESSAGE};
use crate::error::AppError;

/// Standard alphabet, padding optional. Browsers and CLI encoders disagree on trailing `=`.
const UPLOAD_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Upload body as received on the wire. Fields are optional so that a missing field
/// produces the gateway's own client error instead of a deserializer message.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    /// Object key the video is stored under
    #[serde(default)]
    #[schema(example = "holiday.mp4")]
    pub file_name: Option<String>,
    /// Video bytes, base64 encoded
    #[serde(default)]
    pub file_content: Option<String>,
}

/// An upload that passed validation: a non-empty key and the decoded payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUpload {
    pub file_name: String,
    pub content: Vec<u8>,
}

impl UploadRequest {
    /// Check required fields and decode the payload.
    ///
    /// Both fields must be present and non-empty; `fileContent` must be base64
    /// (ASCII whitespace such as line wrapping is ignored).
    pub fn validate(self) -> Result<ValidatedUpload, AppError> {
        let (file_name, file_content) = match (self.file_name, self.file_content) {
            (Some(name), Some(content)) if !name.is_empty() && !content.is_empty() => {
                (name, content)
            }
            _ => {
                return Err(AppError::InvalidInput(
                    UPLOAD_FIELDS_REQUIRED_MESSAGE.to_string(),
                ))
            }
        };

        let compact: Vec<u8> = file_content
            .bytes()
            .filter(|b| !b.is_ascii_whitespace())
            .collect();
        let content = UPLOAD_BASE64
            .decode(&compact)
            .map_err(|_| AppError::InvalidInput(INVALID_BASE64_MESSAGE.to_string()))?;

        Ok(ValidatedUpload { file_name, content })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    #[schema(example = "File uploaded successfully")]
    pub message: String,
}

/// An object the gateway wrote. Immutable from the pipeline's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bucket: String,
    pub key: String,
    pub content_type: String,
    pub size_bytes: u64,
}
