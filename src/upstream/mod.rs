//! Forwarding adapter for the external transcription service
//!
//! The relay never interprets audio itself: validated payloads are handed
//! to a [`Transcriber`], which forwards them upstream and returns either
//! the transcript text or the upstream failure unchanged. No retries.

mod client;

pub use client::{Transcriber, UpstreamError, WhisperClient};
