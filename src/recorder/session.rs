use super::capture::{AudioChunk, CaptureBackend, CaptureError};
use super::client::{SubmitError, TranscribeEndpoint};
use super::history::{TranscriptEntry, TranscriptHistory};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Recorder lifecycle: `Idle → Recording → Processing → Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderStatus {
    Idle,
    Recording,
    Processing,
}

#[derive(Debug, Error)]
pub enum RecorderError {
    /// A session is already recording or processing. Overlapping sessions
    /// are rejected at the state machine, not by a UI guard.
    #[error("a recording session is already active")]
    SessionActive,

    /// The capture device could not start.
    #[error(transparent)]
    Capture(#[from] CaptureError),

    /// The assembled payload was submitted and rejected; it has been
    /// discarded and no transcript entry was created.
    #[error(transparent)]
    Submission(#[from] SubmitError),
}

/// Client-side recording state machine.
///
/// One session at a time: `start` opens the capture backend's chunk
/// stream, `stop` drains it in recorded order, concatenates the chunks
/// into a single payload, and submits it to the relay. A successful
/// submission appends a [`TranscriptEntry`] to the in-memory history; a
/// failed one discards the payload and leaves the history untouched.
pub struct Recorder {
    backend: Box<dyn CaptureBackend>,
    endpoint: Arc<dyn TranscribeEndpoint>,
    status: RecorderStatus,
    inbox: Option<mpsc::Receiver<AudioChunk>>,
    history: TranscriptHistory,
}

impl Recorder {
    pub fn new(backend: Box<dyn CaptureBackend>, endpoint: Arc<dyn TranscribeEndpoint>) -> Self {
        Self {
            backend,
            endpoint,
            status: RecorderStatus::Idle,
            inbox: None,
            history: TranscriptHistory::new(),
        }
    }

    pub fn status(&self) -> RecorderStatus {
        self.status
    }

    /// Start a new recording session.
    ///
    /// Rejected while a session is recording or still processing. On a
    /// capture failure the recorder stays `Idle` and the error
    /// distinguishes permission denial from device unavailability.
    pub async fn start(&mut self) -> Result<(), RecorderError> {
        if self.status != RecorderStatus::Idle {
            return Err(RecorderError::SessionActive);
        }

        let inbox = self.backend.start().await?;
        self.inbox = Some(inbox);
        self.status = RecorderStatus::Recording;

        info!("Recording started");
        Ok(())
    }

    /// Stop the current session and submit the assembled payload.
    ///
    /// A no-op returning `None` when idle. Otherwise the chunk stream is
    /// drained in arrival order, concatenated, and submitted; the session
    /// is consumed either way.
    pub async fn stop(&mut self) -> Result<Option<TranscriptEntry>, RecorderError> {
        if self.status != RecorderStatus::Recording {
            return Ok(None);
        }

        // Closing the backend terminates the chunk stream so the drain
        // below completes.
        self.backend.stop().await?;

        let payload = match self.inbox.take() {
            Some(inbox) => Self::assemble(inbox).await,
            None => Vec::new(),
        };

        self.status = RecorderStatus::Processing;
        info!("Recording stopped; submitting {} bytes", payload.len());

        let mime = self.backend.mime_type().to_string();
        let result = self.endpoint.submit(payload, &mime).await;

        // The payload is consumed either way; the recorder is reusable.
        self.status = RecorderStatus::Idle;

        match result {
            Ok(text) => Ok(Some(self.history.push(text).clone())),
            Err(e) => {
                warn!("Submission failed: {}", e.user_message());
                Err(RecorderError::Submission(e))
            }
        }
    }

    /// Drain the chunk stream and concatenate chunk bytes in recorded
    /// order. No chunk is dropped or reordered.
    async fn assemble(mut inbox: mpsc::Receiver<AudioChunk>) -> Vec<u8> {
        let mut payload = Vec::new();
        while let Some(chunk) = inbox.recv().await {
            payload.extend_from_slice(&chunk.data);
        }
        payload
    }

    pub fn history(&self) -> &[TranscriptEntry] {
        self.history.entries()
    }

    /// Remove one transcript entry by id; false when no entry matches.
    pub fn delete_entry(&mut self, id: i64) -> bool {
        self.history.delete(id)
    }

    /// Empty the transcript history.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}
