use bytes::Bytes;
use std::path::Path;

use crate::common::error::ValidationError;

/// 50 MiB, inclusive.
pub const MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;
pub const PDF_CONTENT_TYPE: &str = "application/pdf";
const PDF_MAGIC: &[u8] = b"%PDF-";

/// A single file selected for analysis. Lives only for the duration of one upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub name: String,
    pub content_type: String,
    /// Declared size; equals `payload.len()` unless the file was too large to load.
    pub size: u64,
    pub payload: Bytes,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        let payload = payload.into();
        Self {
            name: name.into(),
            content_type: content_type.into(),
            size: payload.len() as u64,
            payload,
        }
    }

    /// Load a file from disk, declaring its content type from the extension or,
    /// failing that, from the `%PDF-` header. Oversized files keep their size but
    /// are not read into memory.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, ValidationError> {
        let path = path.as_ref();
        let unreadable = |e: std::io::Error| ValidationError::Unreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        };

        let metadata = tokio::fs::metadata(path).await.map_err(unreadable)?;
        if !metadata.is_file() {
            return Err(ValidationError::Unreadable {
                path: path.display().to_string(),
                reason: "not a regular file".to_string(),
            });
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        if metadata.len() > MAX_UPLOAD_BYTES {
            log::debug!("{} is {} bytes, skipping read", name, metadata.len());
            return Ok(Self {
                content_type: content_type_for(path, &[]),
                name,
                size: metadata.len(),
                payload: Bytes::new(),
            });
        }

        let data = tokio::fs::read(path).await.map_err(unreadable)?;
        Ok(Self {
            content_type: content_type_for(path, &data),
            name,
            size: data.len() as u64,
            payload: Bytes::from(data),
        })
    }

    pub fn is_pdf(&self) -> bool {
        self.content_type.to_ascii_lowercase().contains("pdf")
    }
}

fn content_type_for(path: &Path, data: &[u8]) -> String {
    let by_extension = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);
    if by_extension || data.starts_with(PDF_MAGIC) {
        PDF_CONTENT_TYPE.to_string()
    } else {
        "application/octet-stream".to_string()
    }
}

/// Check a selection against the upload rules: present, PDF, at most 50 MiB.
pub fn validate_upload(file: Option<&UploadedFile>) -> Result<(), ValidationError> {
    let file = file.ok_or(ValidationError::NoFile)?;
    if !file.is_pdf() {
        return Err(ValidationError::NotPdf {
            content_type: file.content_type.clone(),
        });
    }
    if file.size > MAX_UPLOAD_BYTES {
        return Err(ValidationError::TooLarge { size: file.size });
    }
    Ok(())
}
