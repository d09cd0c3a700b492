//! Pipeline-wide constants.

/// Content type recorded on every object written by the upload gateway.
pub const VIDEO_CONTENT_TYPE: &str = "video/mp4";

/// Content encoding recorded on uploaded objects. The payload arrived base64 encoded;
/// the persisted bytes are the decoded binary.
pub const UPLOAD_CONTENT_ENCODING: &str = "base64";

/// Only object keys ending with this suffix are handed to the work queue.
pub const VIDEO_KEY_SUFFIX: &str = ".mp4";

pub const UPLOAD_SUCCESS_MESSAGE: &str = "File uploaded successfully";
pub const UPLOAD_FIELDS_REQUIRED_MESSAGE: &str = "fileName and fileContent are required";
pub const INVALID_BASE64_MESSAGE: &str = "fileContent must be valid base64";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";
