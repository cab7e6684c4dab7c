//! Input resolution: read a local image and work out how to label it.
//!
//! The whole file is read before any network activity so a bad path fails
//! fast, without a half-sent upload. The filename and content type attached
//! to the `file` part are inferred from the local file: the extension first,
//! then the magic bytes.

use crate::error::ConvertError;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// Content type sent when neither extension nor content identify the image.
pub const FALLBACK_MIME: &str = "application/octet-stream";

/// An image ready to be attached to a multipart request.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Label in-memory bytes the same way a file on disk would be labelled.
    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime_type = infer_mime(Path::new(&file_name), &bytes).to_string();
        Self {
            file_name,
            mime_type,
            bytes,
        }
    }
}

/// Read the image at `path`.
pub async fn load_image(path: &Path) -> Result<ImageUpload, ConvertError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
        ErrorKind::NotFound => ConvertError::FileNotFound {
            path: path.to_path_buf(),
        },
        ErrorKind::PermissionDenied => ConvertError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => ConvertError::FileReadFailed {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());

    let upload = ImageUpload::from_bytes(file_name, bytes);
    debug!(
        "Loaded {} ({} bytes, {})",
        path.display(),
        upload.bytes.len(),
        upload.mime_type
    );
    Ok(upload)
}

/// Infer a content type from the file extension, falling back to sniffing.
pub fn infer_mime(path: &Path, bytes: &[u8]) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase());

    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        Some("webp") => "image/webp",
        _ => image::guess_format(bytes)
            .map(|f| f.to_mime_type())
            .unwrap_or(FALLBACK_MIME),
    }
}
