use crate::config::UpstreamConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};

/// Failure modes of a single forwarding attempt.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The spooled payload could not be read back.
    #[error("failed to read spooled audio: {0}")]
    Payload(String),

    /// The request never produced an upstream response.
    #[error("network error: {0}")]
    Network(String),

    /// The upstream service answered with a non-2xx status.
    #[error("transcription service returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The upstream 2xx body did not match the expected shape.
    #[error("unexpected response from transcription service: {0}")]
    Parse(String),
}

impl UpstreamError {
    /// Upstream HTTP status, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            UpstreamError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Human-readable detail for the relay's structured error body.
    pub fn detail(&self) -> String {
        match self {
            UpstreamError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Seam between the relay handler and the external transcription service.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Forward one audio payload and return the transcript text.
    async fn transcribe(
        &self,
        audio_path: &Path,
        mime: &str,
        filename: &str,
    ) -> Result<String, UpstreamError>;
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// OpenAI-style error envelope: `{"error": {"message": "..."}}`.
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Forwarding adapter for the OpenAI Whisper transcription endpoint.
///
/// Builds a multipart form carrying the audio bytes and the configured
/// model identifier, bearer-authenticated with the startup credential.
/// A single upstream failure is a single relay failure.
pub struct WhisperClient {
    http: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl WhisperClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to build upstream HTTP client")?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl Transcriber for WhisperClient {
    async fn transcribe(
        &self,
        audio_path: &Path,
        mime: &str,
        filename: &str,
    ) -> Result<String, UpstreamError> {
        let bytes = tokio::fs::read(audio_path)
            .await
            .map_err(|e| UpstreamError::Payload(e.to_string()))?;

        info!("Forwarding {} ({} bytes) upstream", filename, bytes.len());

        let file_part = Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(mime)
            .map_err(|e| UpstreamError::Payload(e.to_string()))?;

        let form = Form::new()
            .part("file", file_part)
            .text("model", self.model.clone());

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| UpstreamError::Network(e.to_string()))?;

        let status = response.status();

        if status.is_success() {
            let body: TranscriptionResponse = response
                .json()
                .await
                .map_err(|e| UpstreamError::Parse(e.to_string()))?;

            info!("Transcription successful: {} chars", body.text.len());
            Ok(body.text)
        } else {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);

            error!("Upstream error ({}): {}", status.as_u16(), message);

            Err(UpstreamError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_exposes_status_and_detail() {
        let err = UpstreamError::Api {
            status: 401,
            message: "Incorrect API key provided".to_string(),
        };
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.detail(), "Incorrect API key provided");
    }

    #[test]
    fn network_error_has_no_status() {
        let err = UpstreamError::Network("connection refused".to_string());
        assert_eq!(err.status(), None);
        assert!(err.detail().contains("connection refused"));
    }
}
