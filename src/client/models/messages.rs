use crate::client::models::uploaded_file::UploadedFile;
use crate::client::services::progress::UploadProgress;
use crate::common::error::{ServiceError, ValidationError};
use crate::common::models::{SetupResponse, UploadAnalyzeResponse};

#[derive(Debug, Clone)]
pub enum Message {
    // Connection check
    RetryConnection,
    ConnectionChecked(Result<SetupResponse, ServiceError>),
    // File selection
    FilePathChanged(String),
    SubmitFile,
    FileLoaded(Result<UploadedFile, ValidationError>),
    // Upload lifecycle
    UploadProgressed(UploadProgress),
    UploadFinished(Result<UploadAnalyzeResponse, ServiceError>),
    // Banner expiry and dismissal, tagged with the log entry they target
    ClearLog(u64),
}
