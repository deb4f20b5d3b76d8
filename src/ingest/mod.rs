//! Upload ingestion for the relay
//!
//! This module owns everything between the multipart request body and the
//! forwarding adapter:
//! - MIME allow-list and size-limit validation
//! - Spooling the audio field to a uniquely named temporary file
//! - Unconditional cleanup of that file when the request finishes

mod artifact;
mod validate;

pub use artifact::{spool_audio_field, UploadArtifact};
pub use validate::{is_allowed_mime, ALLOWED_MIME_TYPES, MAX_UPLOAD_BYTES};

use thiserror::Error;

/// Reasons an upload never makes it to the forwarding adapter.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The multipart body contained no file field.
    #[error("no audio file uploaded")]
    MissingFile,

    /// The declared MIME type is not on the audio allow-list.
    #[error("unsupported file type: {mime}")]
    UnsupportedType { mime: String },

    /// The audio field exceeded the size limit mid-stream.
    #[error("file exceeds {limit} byte limit")]
    TooLarge { limit: u64 },

    /// The multipart stream could not be parsed.
    #[error("malformed upload: {0}")]
    Malformed(String),

    /// Filesystem failure while spooling.
    #[error("failed to spool upload: {0}")]
    Io(#[from] std::io::Error),
}
