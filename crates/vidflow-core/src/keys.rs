//! Object key encoding as it travels in object-created notifications.
//!
//! S3 notifications carry keys form-encoded: spaces become `+` and every other reserved
//! byte is percent-encoded. Normalization reverses that: `+` is replaced with a space
//! first, then percent sequences are decoded, so an encoded `%2B` survives as a literal `+`.

use crate::constants::VIDEO_KEY_SUFFIX;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("object key '{key}' is not valid percent-encoded UTF-8")]
pub struct KeyDecodeError {
    pub key: String,
}

/// Every `%` must start a two-hex-digit escape.
fn has_valid_escapes(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            match bytes.get(i + 1..i + 3) {
                Some([hi, lo]) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => i += 3,
                _ => return false,
            }
        } else {
            i += 1;
        }
    }
    true
}

/// Recover the logical object path from a transport-encoded notification key.
///
/// Fails on a malformed escape (`%` not followed by two hex digits) or when the decoded
/// bytes are not UTF-8.
pub fn normalize_object_key(raw: &str) -> Result<String, KeyDecodeError> {
    if !has_valid_escapes(raw) {
        return Err(KeyDecodeError {
            key: raw.to_string(),
        });
    }
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .map_err(|_| KeyDecodeError {
            key: raw.to_string(),
        })
}

/// Encode a logical key the way S3 does in event notifications. Path separators are kept.
pub fn encode_event_key(key: &str) -> String {
    key.split('/')
        .map(|segment| urlencoding::encode(segment).replace("%20", "+"))
        .collect::<Vec<_>>()
        .join("/")
}

/// Whether a normalized key names a video the pipeline hands to the work queue.
pub fn is_video_key(key: &str) -> bool {
    key.ends_with(VIDEO_KEY_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plus_becomes_space() {
        assert_eq!(
            normalize_object_key("my video+clip.mp4").unwrap(),
            "my video clip.mp4"
        );
    }

    #[test]
    fn percent_sequences_are_decoded() {
        assert_eq!(
            normalize_object_key("uploads/holiday%20%282024%29.mp4").unwrap(),
            "uploads/holiday (2024).mp4"
        );
    }

    #[test]
    fn encoded_plus_survives_as_literal_plus() {
        assert_eq!(normalize_object_key("a%2Bb.mp4").unwrap(), "a+b.mp4");
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let err = normalize_object_key("bad%FF.mp4").unwrap_err();
        assert_eq!(err.key, "bad%FF.mp4");
    }

    #[test]
    fn malformed_escapes_are_rejected() {
        for raw in ["100%zz.mp4", "a%2.mp4", "clip.mp4%", "50%.mp4"] {
            let err = normalize_object_key(raw).unwrap_err();
            assert_eq!(err.key, raw);
        }
    }

    #[test]
    fn lowercase_hex_escapes_are_accepted() {
        assert_eq!(normalize_object_key("a%2bb%3d.mp4").unwrap(), "a+b=.mp4");
    }

    #[test]
    fn encode_then_normalize_recovers_the_key() {
        let key = "clips/my video+final (1).mp4";
        let encoded = encode_event_key(key);
        assert_eq!(encoded, "clips/my+video%2Bfinal+%281%29.mp4");
        assert_eq!(normalize_object_key(&encoded).unwrap(), key);
    }

    #[test]
    fn suffix_filter_is_case_sensitive() {
        assert!(is_video_key("a.mp4"));
        assert!(is_video_key("dir/b c.mp4"));
        assert!(!is_video_key("a.MP4"));
        assert!(!is_video_key("a.mp4.txt"));
        assert!(!is_video_key("thumbnail.jpg"));
    }
}
