//! Client-side recording pipeline
//!
//! This module provides the `Recorder` abstraction that manages:
//! - Audio capture via a pluggable [`CaptureBackend`]
//! - The `Idle → Recording → Processing → Idle` session state machine
//! - Payload assembly (ordered chunk concatenation at stop time)
//! - Submission to the relay and in-memory transcript history

mod capture;
mod client;
mod history;
mod session;

pub use capture::{AudioChunk, CaptureBackend, CaptureError, FileCapture, FileCaptureConfig};
pub use client::{RelayClient, SubmitError, TranscribeEndpoint};
pub use history::{TranscriptEntry, TranscriptHistory};
pub use session::{Recorder, RecorderError, RecorderStatus};
