pub mod config;
pub mod http;
pub mod ingest;
pub mod recorder;
pub mod upstream;

pub use config::Config;
pub use http::{create_router, AppState};
pub use ingest::{IngestError, UploadArtifact, MAX_UPLOAD_BYTES};
pub use recorder::{
    AudioChunk, CaptureBackend, CaptureError, Recorder, RecorderError, RecorderStatus,
    RelayClient, TranscribeEndpoint, TranscriptEntry, TranscriptHistory,
};
pub use upstream::{Transcriber, UpstreamError, WhisperClient};
