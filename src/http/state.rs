use crate::config::Config;
use crate::upstream::Transcriber;
use std::path::PathBuf;
use std::sync::Arc;

/// Shared application state for HTTP handlers.
///
/// Everything here is read-only after startup; concurrent requests share
/// nothing mutable.
#[derive(Clone)]
pub struct AppState {
    /// Process configuration (credential, origins, spool dir).
    pub config: Arc<Config>,

    /// Forwarding adapter for the external transcription service.
    pub transcriber: Arc<dyn Transcriber>,

    /// Directory where uploads are spooled before forwarding.
    pub spool_dir: PathBuf,
}

impl AppState {
    pub fn new(config: Arc<Config>, transcriber: Arc<dyn Transcriber>) -> Self {
        let spool_dir = config.spool_dir();
        Self {
            config,
            transcriber,
            spool_dir,
        }
    }
}
