use super::validate::{is_allowed_mime, MAX_UPLOAD_BYTES};
use super::IngestError;
use axum::extract::Multipart;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// A single uploaded audio payload spooled to disk.
///
/// The artifact owns a uniquely named temporary file for the lifetime of
/// one request. Dropping it removes the file, so every handler exit path
/// (validation failure, upstream success, upstream failure, panic unwind)
/// cleans up exactly once.
pub struct UploadArtifact {
    path: PathBuf,
    mime: String,
    filename: String,
    size: u64,
    file: Option<File>,
}

impl UploadArtifact {
    /// Create an empty artifact in `spool_dir` with a unique name.
    pub async fn create(
        spool_dir: &Path,
        mime: &str,
        filename: &str,
    ) -> Result<Self, IngestError> {
        let path = spool_dir.join(format!("upload-{}", uuid::Uuid::new_v4()));
        let file = File::create(&path).await?;

        Ok(Self {
            path,
            mime: mime.to_string(),
            filename: filename.to_string(),
            size: 0,
            file: Some(file),
        })
    }

    /// Append a chunk of the inbound field, enforcing the size limit
    /// mid-stream. On breach the partial spool stays on disk only until
    /// the artifact is dropped.
    pub async fn append(&mut self, chunk: &[u8]) -> Result<(), IngestError> {
        self.size += chunk.len() as u64;
        if self.size > MAX_UPLOAD_BYTES {
            return Err(IngestError::TooLarge {
                limit: MAX_UPLOAD_BYTES,
            });
        }

        if let Some(file) = &mut self.file {
            file.write_all(chunk).await?;
        }

        Ok(())
    }

    /// Flush and close the spool file. The artifact remains readable via
    /// [`UploadArtifact::path`] until dropped.
    pub async fn finish(&mut self) -> Result<(), IngestError> {
        if let Some(mut file) = self.file.take() {
            file.flush().await?;
        }

        debug!(
            "Spooled upload: {} ({} bytes, {})",
            self.path.display(),
            self.size,
            self.mime
        );

        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn size(&self) -> u64 {
        self.size
    }
}

impl Drop for UploadArtifact {
    fn drop(&mut self) {
        // Close the handle before unlinking; harmless if already finished.
        self.file.take();

        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to remove spooled upload {}: {}", self.path.display(), e);
            }
        }
    }
}

/// Pull the audio file field out of a multipart body and spool it.
///
/// The field name is insignificant: the first field carrying a filename or
/// content type is taken as the audio payload, matching how the browser
/// client posts `FormData`. Bare text fields are skipped.
pub async fn spool_audio_field(
    multipart: &mut Multipart,
    spool_dir: &Path,
) -> Result<UploadArtifact, IngestError> {
    loop {
        let field = multipart
            .next_field()
            .await
            .map_err(|e| IngestError::Malformed(e.to_string()))?;

        let Some(mut field) = field else {
            return Err(IngestError::MissingFile);
        };

        if field.file_name().is_none() && field.content_type().is_none() {
            continue;
        }

        let mime = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        if !is_allowed_mime(&mime) {
            return Err(IngestError::UnsupportedType { mime });
        }

        let filename = field.file_name().unwrap_or("audio.mp3").to_string();
        let mut artifact = UploadArtifact::create(spool_dir, &mime, &filename).await?;

        loop {
            let chunk = field
                .chunk()
                .await
                .map_err(|e| IngestError::Malformed(e.to_string()))?;
            match chunk {
                Some(chunk) => artifact.append(&chunk).await?,
                None => break,
            }
        }

        artifact.finish().await?;
        return Ok(artifact);
    }
}
