//! Error kinds shared by the service client and the workflow controller

use thiserror::Error;

/// Failures of a remote call. Messages are kept as text so the error can
/// travel inside GUI messages, which must be `Clone`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("Health check failed: {0}")]
    ConnectionCheckFailed(String),

    #[error("PDF upload failed: {0}")]
    UploadFailed(String),

    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("HTTP client setup failed: {0}")]
    ClientInit(String),
}

/// Reasons a selected file is refused before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("No file selected")]
    NoFile,

    #[error("Please select a PDF file (got '{content_type}')")]
    NotPdf { content_type: String },

    #[error("File size must be less than 50MB (file is {size} bytes)")]
    TooLarge { size: u64 },

    #[error("Could not read {path}: {reason}")]
    Unreadable { path: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("Backend is not connected")]
    NotConnected,

    #[error("An upload is already in progress")]
    Busy,
}
