/// Maximum accepted size of the audio field (25 MiB), matching the
/// upstream service's own upload cap.
pub const MAX_UPLOAD_BYTES: u64 = 25 * 1024 * 1024;

/// Audio MIME types accepted by the relay. Anything else is rejected
/// before a single byte is forwarded upstream.
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "audio/webm",
    "audio/mp3",
    "audio/mpeg",
    "audio/mp4",
    "audio/wav",
    "audio/ogg",
    "audio/m4a",
    "audio/x-m4a",
];

/// Check a declared MIME type against the allow-list. Codec parameters
/// (e.g. `audio/webm;codecs=opus`) are ignored for the comparison.
pub fn is_allowed_mime(mime: &str) -> bool {
    let essence = mime.split(';').next().unwrap_or(mime).trim();
    ALLOWED_MIME_TYPES
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(essence))
}
