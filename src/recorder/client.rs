use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

/// Submission failures. The pending payload is always discarded; nothing
/// is retried.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The relay could not be reached.
    #[error("network error: {0}")]
    Network(String),

    /// The relay answered with a non-2xx status.
    #[error("transcription rejected ({status}): {details}")]
    Rejected { status: u16, details: String },
}

impl SubmitError {
    /// Message shown to the user: the relay-provided detail when there is
    /// one, a generic failure otherwise.
    pub fn user_message(&self) -> String {
        match self {
            SubmitError::Rejected { details, .. } if !details.is_empty() => details.clone(),
            _ => "Transcription failed".to_string(),
        }
    }
}

/// Seam between the recorder and the relay, so tests can script responses.
#[async_trait]
pub trait TranscribeEndpoint: Send + Sync {
    /// Submit one assembled audio payload and return the transcript text.
    async fn submit(&self, audio: Vec<u8>, mime: &str) -> Result<String, SubmitError>;
}

#[derive(Debug, Deserialize)]
struct TranscribeBody {
    text: String,
}

/// Relay error body; only `details` matters to the recorder.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    details: String,
}

/// HTTP client submitting assembled recordings to the relay's
/// `POST /transcribe` endpoint.
pub struct RelayClient {
    http: Client,
    base_url: String,
}

impl RelayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl TranscribeEndpoint for RelayClient {
    async fn submit(&self, audio: Vec<u8>, mime: &str) -> Result<String, SubmitError> {
        info!("Submitting recording ({} bytes, {})", audio.len(), mime);

        let part = Part::bytes(audio)
            .file_name("recording.webm")
            .mime_str(mime)
            .map_err(|e| SubmitError::Network(e.to_string()))?;

        let form = Form::new().part("audio", part);

        let response = self
            .http
            .post(format!("{}/transcribe", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| SubmitError::Network(e.to_string()))?;

        let status = response.status();

        if status.is_success() {
            let body: TranscribeBody = response
                .json()
                .await
                .map_err(|e| SubmitError::Network(e.to_string()))?;
            Ok(body.text)
        } else {
            let details = response
                .json::<ErrorBody>()
                .await
                .map(|body| body.details)
                .unwrap_or_default();

            Err(SubmitError::Rejected {
                status: status.as_u16(),
                details,
            })
        }
    }
}
