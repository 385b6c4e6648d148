//! Board recognition from photos.
//!
//! Only the contract lives here. The bundled recognizer does not look at the
//! image; it reports a fixed position after a delay.

use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

/// Largest accepted upload.
pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

const ACCEPTED_MEDIA_TYPES: [&str; 4] = ["image/jpeg", "image/jpg", "image/png", "image/gif"];

/// Position the stub recognizer reports for every image.
pub const STUB_RECOGNIZED_FEN: &str = "rnbqkb1r/pppp1ppp/5n2/2b1p3/2B1P3/5N2/PPPP1PPP/RNBQK2R";

#[derive(Debug, thiserror::Error)]
pub enum RecognitionError {
    #[error("Failed to read image: {0}")]
    Io(#[from] std::io::Error),
    #[error("File must be a JPEG, PNG, or GIF image (got {0})")]
    UnsupportedType(String),
    #[error("File size must be at most 10MB (got {0} bytes)")]
    TooLarge(u64),
    #[error("Recognition failed: {0}")]
    Failed(String),
}

/// An image handed to a recognizer.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Read an image from disk, inferring its media type from the extension.
    pub fn from_path(path: &Path) -> Result<Self, RecognitionError> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            file_name,
            media_type: media_type_for(path).to_string(),
            bytes,
        })
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

fn media_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

/// Check type and size before an upload reaches a recognizer.
pub fn validate_image(image: &ImageUpload) -> Result<(), RecognitionError> {
    if !ACCEPTED_MEDIA_TYPES.contains(&image.media_type.as_str()) {
        return Err(RecognitionError::UnsupportedType(image.media_type.clone()));
    }
    if image.size() > MAX_IMAGE_BYTES {
        return Err(RecognitionError::TooLarge(image.size()));
    }
    Ok(())
}

/// Turns a board photo into a FEN placement field.
#[async_trait]
pub trait ImageRecognizer: Send + Sync {
    async fn recognize(&self, image: &ImageUpload) -> Result<String, RecognitionError>;
}

/// Recognizer that ignores the image and reports [`STUB_RECOGNIZED_FEN`].
#[derive(Debug, Clone)]
pub struct StubRecognizer {
    delay: Duration,
}

impl StubRecognizer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl ImageRecognizer for StubRecognizer {
    async fn recognize(&self, image: &ImageUpload) -> Result<String, RecognitionError> {
        tracing::info!(file = %image.file_name, bytes = image.size(), "Simulating board recognition");
        tokio::time::sleep(self.delay).await;
        Ok(STUB_RECOGNIZED_FEN.to_string())
    }
}
