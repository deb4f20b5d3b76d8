//! HTTP relay between the browser recorder and the transcription service
//!
//! This module exposes the relay's REST surface:
//! - POST /transcribe - accept one multipart audio upload, forward it
//!   upstream, return the transcript
//! - GET /health - health check
//!
//! Validation (MIME allow-list, size limit) happens in `crate::ingest`
//! before any bytes reach the forwarding adapter.

mod handlers;
mod routes;
mod state;

pub use handlers::{ErrorResponse, HealthResponse, TranscribeResponse};
pub use routes::create_router;
pub use state::AppState;
