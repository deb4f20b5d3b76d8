use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

/// One encoded audio chunk produced by a capture backend.
///
/// Chunks are opaque compressed bytes; the recorder never decodes them,
/// only concatenates them in sequence order at stop time.
#[derive(Debug, Clone)]
pub struct AudioChunk {
    /// Encoded audio bytes.
    pub data: Vec<u8>,
    /// Position in the session's chunk sequence (0-indexed).
    pub sequence: u32,
    /// Milliseconds since capture started.
    pub timestamp_ms: u64,
}

/// Why a capture device could not start. The two cases are surfaced to the
/// user with distinct messages.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("microphone access denied; please grant permission")]
    PermissionDenied,

    #[error("audio device unavailable: {0}")]
    DeviceUnavailable(String),
}

/// Audio capture backend trait
///
/// A backend produces a finite, ordered sequence of encoded chunks per
/// session over a channel. `stop` must terminate the chunk stream so the
/// recorder's drain at stop time completes.
#[async_trait]
pub trait CaptureBackend: Send + Sync {
    /// Start capturing audio.
    ///
    /// Returns a channel receiver that will receive chunks in recorded
    /// order until the session ends.
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioChunk>, CaptureError>;

    /// Stop capturing audio and close the chunk stream.
    async fn stop(&mut self) -> Result<(), CaptureError>;

    /// Check if the backend is currently capturing.
    fn is_capturing(&self) -> bool;

    /// MIME type of the chunks this backend produces.
    fn mime_type(&self) -> &str;
}

/// Configuration for [`FileCapture`].
#[derive(Debug, Clone)]
pub struct FileCaptureConfig {
    /// Encoded audio file to replay as a capture session.
    pub path: PathBuf,
    /// Interval between emitted chunks (default: 1 second).
    pub chunk_interval: Duration,
    /// Bytes per chunk (default: 32 KiB).
    pub chunk_bytes: usize,
    /// MIME type of the source file.
    pub mime: String,
}

impl FileCaptureConfig {
    pub fn new(path: PathBuf, mime: impl Into<String>) -> Self {
        Self {
            path,
            chunk_interval: Duration::from_secs(1),
            chunk_bytes: 32 * 1024,
            mime: mime.into(),
        }
    }
}

/// File-fed capture backend
///
/// Replays an already-encoded audio file as a session: one fixed-size
/// chunk per interval tick, in file order, until the file is exhausted.
/// Stands in for a live microphone in headless and batch use.
pub struct FileCapture {
    config: FileCaptureConfig,
    task: Option<JoinHandle<()>>,
}

impl FileCapture {
    pub fn new(config: FileCaptureConfig) -> Self {
        Self { config, task: None }
    }
}

#[async_trait]
impl CaptureBackend for FileCapture {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioChunk>, CaptureError> {
        if self.task.is_some() {
            return Err(CaptureError::DeviceUnavailable(
                "capture already running".to_string(),
            ));
        }

        let bytes = tokio::fs::read(&self.config.path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::PermissionDenied {
                CaptureError::PermissionDenied
            } else {
                CaptureError::DeviceUnavailable(e.to_string())
            }
        })?;

        info!(
            "Starting file capture: {} ({} bytes)",
            self.config.path.display(),
            bytes.len()
        );

        let (tx, rx) = mpsc::channel(64);
        let interval = self.config.chunk_interval;
        let chunk_bytes = self.config.chunk_bytes.max(1);
        let interval_ms = interval.as_millis() as u64;

        self.task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);

            for (seq, part) in bytes.chunks(chunk_bytes).enumerate() {
                ticker.tick().await;

                let chunk = AudioChunk {
                    data: part.to_vec(),
                    sequence: seq as u32,
                    timestamp_ms: seq as u64 * interval_ms,
                };

                // Receiver gone means the session was torn down.
                if tx.send(chunk).await.is_err() {
                    break;
                }
            }
        }));

        Ok(rx)
    }

    async fn stop(&mut self) -> Result<(), CaptureError> {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
        }

        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    fn mime_type(&self) -> &str {
        &self.config.mime
    }
}
