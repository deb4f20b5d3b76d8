use super::state::AppState;
use crate::ingest::{self, IngestError};
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::Serialize;
use tracing::{error, info, warn};

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct TranscribeResponse {
    pub text: String,
    pub success: bool,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub success: bool,
}

/// Shared shape of every relay error so clients can uniformly extract
/// a human-readable `details` field.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: String,
    pub success: bool,
}

impl ErrorResponse {
    fn new(error: &str, details: impl Into<String>) -> Self {
        Self {
            error: error.to_string(),
            details: details.into(),
            success: false,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /transcribe
/// Accept one audio file via multipart, forward it upstream, return the
/// transcript. The spooled artifact is removed on every exit path.
pub async fn transcribe(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    // A body that is not multipart at all (wrong content type, missing
    // boundary) still gets the shared error shape.
    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            warn!("Rejected non-multipart request: {}", rejection.body_text());
            return (
                rejection.status(),
                Json(ErrorResponse::new(
                    "File upload failed",
                    rejection.body_text(),
                )),
            )
                .into_response();
        }
    };

    let artifact = match ingest::spool_audio_field(&mut multipart, &state.spool_dir).await {
        Ok(artifact) => artifact,
        Err(e) => return ingest_error_response(e),
    };

    info!(
        "Received upload: {} ({} bytes, {})",
        artifact.filename(),
        artifact.size(),
        artifact.mime()
    );

    match state
        .transcriber
        .transcribe(artifact.path(), artifact.mime(), artifact.filename())
        .await
    {
        Ok(text) => (
            StatusCode::OK,
            Json(TranscribeResponse {
                text,
                success: true,
                timestamp: Utc::now().to_rfc3339(),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Transcription failed: {}", e);

            // Propagate the upstream status when one was received.
            let status = e
                .status()
                .and_then(|code| StatusCode::from_u16(code).ok())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

            (
                status,
                Json(ErrorResponse::new("Transcription failed", e.detail())),
            )
                .into_response()
        }
    }
    // `artifact` drops here, removing the spool file.
}

/// GET /health
/// Health check endpoint. No side effects.
pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            success: true,
        }),
    )
}

fn ingest_error_response(err: IngestError) -> Response {
    let (status, error, details) = match &err {
        IngestError::MissingFile => (
            StatusCode::BAD_REQUEST,
            "No audio file uploaded",
            "Attach an audio file field to the multipart form".to_string(),
        ),
        IngestError::UnsupportedType { mime } => {
            warn!("Rejected upload with unsupported type: {}", mime);
            (
                StatusCode::BAD_REQUEST,
                "Invalid file type",
                "Please upload a valid audio file (MP3, WebM, WAV, OGG)".to_string(),
            )
        }
        IngestError::TooLarge { .. } => (
            StatusCode::PAYLOAD_TOO_LARGE,
            "File too large",
            "Maximum file size is 25MB".to_string(),
        ),
        IngestError::Malformed(msg) => {
            error!("File upload error: {}", msg);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "File upload failed",
                msg.clone(),
            )
        }
        IngestError::Io(e) => {
            error!("Spool error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "File upload failed",
                e.to_string(),
            )
        }
    };

    (status, Json(ErrorResponse::new(error, details))).into_response()
}
