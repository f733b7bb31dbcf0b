use async_trait::async_trait;
use log::{error, info};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use url::Url;

use crate::client::models::uploaded_file::{UploadedFile, PDF_CONTENT_TYPE};
use crate::client::services::progress::{progress_body, ProgressSender};
use crate::common::config::ClientConfig;
use crate::common::error::ServiceError;
use crate::common::models::{SetupResponse, UploadAnalyzeResponse};

pub const SETUP_ENDPOINT: &str = "api/databricks/setup";
pub const UPLOAD_ENDPOINT: &str = "api/pdf/upload-and-analyze";

/// The two remote calls the workflow depends on.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Ask the backend whether it can reach the data platform.
    async fn check_connection(&self) -> Result<SetupResponse, ServiceError>;

    /// Upload a PDF and wait for the analysis. `progress`, when given, receives
    /// an update for every chunk of the file handed to the transport.
    async fn upload_and_analyze(
        &self,
        file: &UploadedFile,
        create_notebook: bool,
        progress: Option<ProgressSender>,
    ) -> Result<UploadAnalyzeResponse, ServiceError>;
}

#[derive(Debug, Clone)]
pub struct AnalysisService {
    client: reqwest::Client,
    setup_url: Url,
    upload_url: Url,
}

impl AnalysisService {
    pub fn new(config: &ClientConfig) -> Result<Self, ServiceError> {
        let base = parse_base_url(&config.api_url)?;
        let setup_url = base
            .join(SETUP_ENDPOINT)
            .map_err(|e| ServiceError::InvalidBaseUrl(e.to_string()))?;
        let upload_url = base
            .join(UPLOAD_ENDPOINT)
            .map_err(|e| ServiceError::InvalidBaseUrl(e.to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ServiceError::ClientInit(e.to_string()))?;

        Ok(Self { client, setup_url, upload_url })
    }

    pub fn setup_url(&self) -> &Url {
        &self.setup_url
    }

    pub fn upload_url(&self) -> &Url {
        &self.upload_url
    }
}

#[async_trait]
impl AnalysisBackend for AnalysisService {
    async fn check_connection(&self) -> Result<SetupResponse, ServiceError> {
        info!("Checking backend connection at {}", self.setup_url);
        let response = self
            .client
            .get(self.setup_url.clone())
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                error!("Connection check failed: {}", e);
                ServiceError::ConnectionCheckFailed(e.to_string())
            })?;

        response
            .json::<SetupResponse>()
            .await
            .map_err(|e| ServiceError::ConnectionCheckFailed(e.to_string()))
    }

    async fn upload_and_analyze(
        &self,
        file: &UploadedFile,
        create_notebook: bool,
        progress: Option<ProgressSender>,
    ) -> Result<UploadAnalyzeResponse, ServiceError> {
        info!(
            "Uploading {} ({} bytes) to {} (create_notebook={})",
            file.name, file.size, self.upload_url, create_notebook
        );
        let length = file.payload.len() as u64;
        let file_part = Part::stream_with_length(progress_body(file.payload.clone(), progress), length)
            .file_name(file.name.clone())
            // the declared type only has to mention "pdf"; the part always goes out as a PDF
            .mime_str(PDF_CONTENT_TYPE)
            .map_err(|e| ServiceError::UploadFailed(e.to_string()))?;
        let form = Form::new()
            .part("file", file_part)
            .text("create_notebook", create_notebook.to_string());

        let response = self
            .client
            .post(self.upload_url.clone())
            .multipart(form)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                error!("Upload of {} failed: {}", file.name, e);
                ServiceError::UploadFailed(e.to_string())
            })?;

        response
            .json::<UploadAnalyzeResponse>()
            .await
            .map_err(|e| ServiceError::UploadFailed(e.to_string()))
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ServiceError> {
    let mut url = Url::parse(raw.trim()).map_err(|e| ServiceError::InvalidBaseUrl(format!("{}: {}", raw, e)))?;
    if url.cannot_be_a_base() {
        return Err(ServiceError::InvalidBaseUrl(raw.to_string()));
    }
    // join() replaces the last segment unless the path ends with '/'
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_join_onto_base() {
        let svc = AnalysisService::new(&ClientConfig::default()).unwrap();
        assert_eq!(svc.setup_url().as_str(), "http://localhost:8000/api/databricks/setup");
        assert_eq!(svc.upload_url().as_str(), "http://localhost:8000/api/pdf/upload-and-analyze");
    }

    #[test]
    fn base_path_prefix_is_preserved() {
        let cfg = ClientConfig::default().with_api_url("https://gateway.local/analysis");
        let svc = AnalysisService::new(&cfg).unwrap();
        assert_eq!(svc.setup_url().as_str(), "https://gateway.local/analysis/api/databricks/setup");

        let cfg = ClientConfig::default().with_api_url("https://gateway.local/analysis/");
        let svc = AnalysisService::new(&cfg).unwrap();
        assert_eq!(svc.upload_url().as_str(), "https://gateway.local/analysis/api/pdf/upload-and-analyze");
    }

    #[test]
    fn rejects_unusable_base_url() {
        let cfg = ClientConfig::default().with_api_url("not a url");
        assert!(matches!(AnalysisService::new(&cfg), Err(ServiceError::InvalidBaseUrl(_))));
        let cfg = ClientConfig::default().with_api_url("mailto:ops@example.com");
        assert!(matches!(AnalysisService::new(&cfg), Err(ServiceError::InvalidBaseUrl(_))));
    }
}
