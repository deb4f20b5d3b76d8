// Integration tests for the client recording state machine
//
// These tests verify the session lifecycle laws: one session at a time,
// chunks assembled in recorded order, failed submissions discarded, and
// history edits that never disturb entry order.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use voice_relay::recorder::{
    AudioChunk, CaptureBackend, CaptureError, FileCapture, FileCaptureConfig, Recorder,
    RecorderError, RecorderStatus, SubmitError, TranscribeEndpoint,
};

/// Backend that replays a fixed chunk script and closes the stream.
struct ScriptedCapture {
    chunks: Vec<Vec<u8>>,
    capturing: bool,
}

impl ScriptedCapture {
    fn new(chunks: Vec<Vec<u8>>) -> Box<Self> {
        Box::new(Self {
            chunks,
            capturing: false,
        })
    }
}

#[async_trait]
impl CaptureBackend for ScriptedCapture {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioChunk>, CaptureError> {
        let (tx, rx) = mpsc::channel(self.chunks.len().max(1));
        for (seq, data) in self.chunks.iter().cloned().enumerate() {
            let chunk = AudioChunk {
                data,
                sequence: seq as u32,
                timestamp_ms: seq as u64 * 1000,
            };
            tx.send(chunk).await.expect("scripted channel has capacity");
        }
        // tx drops here, closing the stream once the script is consumed.
        self.capturing = true;
        Ok(rx)
    }

    async fn stop(&mut self) -> Result<(), CaptureError> {
        self.capturing = false;
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.capturing
    }

    fn mime_type(&self) -> &str {
        "audio/webm"
    }
}

/// Backend whose device can never start.
struct DeniedCapture;

#[async_trait]
impl CaptureBackend for DeniedCapture {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioChunk>, CaptureError> {
        Err(CaptureError::PermissionDenied)
    }

    async fn stop(&mut self) -> Result<(), CaptureError> {
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        false
    }

    fn mime_type(&self) -> &str {
        "audio/webm"
    }
}

/// Endpoint that records every submitted payload and replies per script.
struct ScriptedEndpoint {
    reply: Result<String, (u16, String)>,
    submissions: Mutex<Vec<(Vec<u8>, String)>>,
}

impl ScriptedEndpoint {
    fn ok(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            submissions: Mutex::new(Vec::new()),
        })
    }

    fn rejected(status: u16, details: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err((status, details.to_string())),
            submissions: Mutex::new(Vec::new()),
        })
    }

    async fn submission_count(&self) -> usize {
        self.submissions.lock().await.len()
    }
}

#[async_trait]
impl TranscribeEndpoint for ScriptedEndpoint {
    async fn submit(&self, audio: Vec<u8>, mime: &str) -> Result<String, SubmitError> {
        self.submissions.lock().await.push((audio, mime.to_string()));
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err((status, details)) => Err(SubmitError::Rejected {
                status: *status,
                details: details.clone(),
            }),
        }
    }
}

#[tokio::test]
async fn chunks_are_concatenated_in_recorded_order() {
    let endpoint = ScriptedEndpoint::ok("hello world");
    let backend = ScriptedCapture::new(vec![b"one-".to_vec(), b"two-".to_vec(), b"three".to_vec()]);
    let mut recorder = Recorder::new(backend, endpoint.clone());

    recorder.start().await.unwrap();
    assert_eq!(recorder.status(), RecorderStatus::Recording);

    let entry = recorder.stop().await.unwrap().expect("entry created");
    assert_eq!(entry.text, "hello world");
    assert_eq!(recorder.status(), RecorderStatus::Idle);

    let submissions = endpoint.submissions.lock().await;
    assert_eq!(submissions.len(), 1);
    let (payload, mime) = &submissions[0];
    assert_eq!(payload.as_slice(), b"one-two-three");
    assert_eq!(mime, "audio/webm");

    assert_eq!(recorder.history().len(), 1);
    assert_eq!(recorder.history()[0].text, "hello world");
}

#[tokio::test]
async fn overlapping_sessions_are_rejected() {
    let endpoint = ScriptedEndpoint::ok("text");
    let backend = ScriptedCapture::new(vec![b"chunk".to_vec()]);
    let mut recorder = Recorder::new(backend, endpoint);

    recorder.start().await.unwrap();
    let err = recorder.start().await.unwrap_err();
    assert!(matches!(err, RecorderError::SessionActive));
    assert_eq!(recorder.status(), RecorderStatus::Recording);
}

#[tokio::test]
async fn stop_while_idle_is_a_noop() {
    let endpoint = ScriptedEndpoint::ok("text");
    let backend = ScriptedCapture::new(vec![b"chunk".to_vec()]);
    let mut recorder = Recorder::new(backend, endpoint.clone());

    let entry = recorder.stop().await.unwrap();
    assert!(entry.is_none());
    assert_eq!(endpoint.submission_count().await, 0);
    assert_eq!(recorder.status(), RecorderStatus::Idle);
}

#[tokio::test]
async fn failed_submission_discards_payload_and_creates_no_entry() {
    let endpoint = ScriptedEndpoint::rejected(500, "Transcription failed upstream");
    let backend = ScriptedCapture::new(vec![b"chunk".to_vec()]);
    let mut recorder = Recorder::new(backend, endpoint.clone());

    recorder.start().await.unwrap();
    let err = recorder.stop().await.unwrap_err();

    match err {
        RecorderError::Submission(e) => {
            assert_eq!(e.user_message(), "Transcription failed upstream");
        }
        other => panic!("unexpected error: {other}"),
    }

    assert!(recorder.history().is_empty());
    assert_eq!(recorder.status(), RecorderStatus::Idle);

    // The recorder is reusable after a failure.
    recorder.start().await.unwrap();
    assert_eq!(recorder.status(), RecorderStatus::Recording);
}

#[tokio::test]
async fn rejection_without_detail_surfaces_generic_message() {
    let endpoint = ScriptedEndpoint::rejected(502, "");
    let backend = ScriptedCapture::new(vec![b"chunk".to_vec()]);
    let mut recorder = Recorder::new(backend, endpoint);

    recorder.start().await.unwrap();
    match recorder.stop().await.unwrap_err() {
        RecorderError::Submission(e) => assert_eq!(e.user_message(), "Transcription failed"),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn permission_denial_keeps_recorder_idle() {
    let endpoint = ScriptedEndpoint::ok("text");
    let mut recorder = Recorder::new(Box::new(DeniedCapture), endpoint.clone());

    let err = recorder.start().await.unwrap_err();
    assert!(matches!(
        err,
        RecorderError::Capture(CaptureError::PermissionDenied)
    ));
    assert_eq!(recorder.status(), RecorderStatus::Idle);
    assert_eq!(endpoint.submission_count().await, 0);
}

#[tokio::test]
async fn history_edits_preserve_order() {
    let endpoint = ScriptedEndpoint::ok("entry");
    let backend = ScriptedCapture::new(vec![b"chunk".to_vec()]);
    let mut recorder = Recorder::new(backend, endpoint);

    let mut ids = Vec::new();
    for _ in 0..3 {
        recorder.start().await.unwrap();
        ids.push(recorder.stop().await.unwrap().unwrap().id);
    }

    // Unknown id: no-op.
    assert!(!recorder.delete_entry(-1));
    assert_eq!(recorder.history().len(), 3);

    // Delete the middle entry; the others keep their order.
    assert!(recorder.delete_entry(ids[1]));
    let remaining: Vec<i64> = recorder.history().iter().map(|e| e.id).collect();
    assert_eq!(remaining, vec![ids[0], ids[2]]);

    recorder.clear_history();
    assert!(recorder.history().is_empty());

    // Clearing an empty history is a no-op.
    recorder.clear_history();
    assert!(recorder.history().is_empty());
}

#[tokio::test]
async fn file_capture_replays_the_source_in_order() {
    let dir = tempfile::TempDir::new().unwrap();
    let source = dir.path().join("clip.webm");
    let content: Vec<u8> = (0u8..200).cycle().take(1000).collect();
    std::fs::write(&source, &content).unwrap();

    let mut config = FileCaptureConfig::new(source, "audio/webm");
    config.chunk_interval = Duration::from_millis(1);
    config.chunk_bytes = 100;

    let endpoint = ScriptedEndpoint::ok("replayed");
    let mut recorder = Recorder::new(Box::new(FileCapture::new(config)), endpoint.clone());

    recorder.start().await.unwrap();
    // 10 chunks at 1ms intervals; give the producer time to finish.
    tokio::time::sleep(Duration::from_millis(200)).await;
    recorder.stop().await.unwrap();

    let submissions = endpoint.submissions.lock().await;
    assert_eq!(submissions[0].0, content, "payload must equal the source bytes in order");
}

#[tokio::test]
async fn missing_capture_file_reports_device_unavailable() {
    let config = FileCaptureConfig::new("/nonexistent/clip.webm".into(), "audio/webm");
    let endpoint = ScriptedEndpoint::ok("text");
    let mut recorder = Recorder::new(Box::new(FileCapture::new(config)), endpoint);

    let err = recorder.start().await.unwrap_err();
    assert!(matches!(
        err,
        RecorderError::Capture(CaptureError::DeviceUnavailable(_))
    ));
    assert_eq!(recorder.status(), RecorderStatus::Idle);
}
