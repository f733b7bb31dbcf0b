use log::{error, info, warn};

use crate::client::gui::views::logger::{LogLevel, LogMessage};
use crate::client::models::uploaded_file::{validate_upload, UploadedFile};
use crate::client::services::analysis_service::AnalysisBackend;
use crate::client::services::progress::{ProgressSender, UploadProgress};
use crate::common::config::{ClientConfig, UploadFailurePolicy};
use crate::common::error::{ServiceError, ValidationError, WorkflowError};
use crate::common::models::{AnalysisResult, SetupResponse, UploadAnalyzeResponse};

pub const PROCESSING_LABEL: &str = "Uploading and analyzing File...";
const MAX_LOG_ENTRIES: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Checking,
    Connected,
    Disconnected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionEvent {
    CheckStarted,
    CheckSucceeded,
    CheckFailed,
    UploadFailed,
}

impl ConnectionState {
    /// Transition table for the connection indicator.
    pub fn on(self, event: ConnectionEvent) -> ConnectionState {
        use ConnectionEvent::*;
        use ConnectionState::*;
        match (self, event) {
            (_, CheckStarted) => Checking,
            (Checking, CheckSucceeded) => Connected,
            (Checking, CheckFailed) => Disconnected,
            // a check in flight decides the state, not a stray upload failure
            (Checking, UploadFailed) => Checking,
            (Connected | Disconnected, UploadFailed) => Disconnected,
            // stale check results are ignored
            (state, CheckSucceeded | CheckFailed) => state,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConnectionState::Checking => "Loading...",
            ConnectionState::Connected => "Connected",
            ConnectionState::Disconnected => "Disconnected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProcessingState {
    #[default]
    Idle,
    Uploading { label: String, file_name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessingEvent {
    Started { file_name: String },
    Finished,
}

impl ProcessingState {
    /// Transition table for the upload busy-guard. `None` means the event is
    /// not allowed in the current state.
    pub fn on(&self, event: ProcessingEvent) -> Option<ProcessingState> {
        match (self, event) {
            (ProcessingState::Idle, ProcessingEvent::Started { file_name }) => Some(ProcessingState::Uploading {
                label: PROCESSING_LABEL.to_string(),
                file_name,
            }),
            (ProcessingState::Uploading { .. }, ProcessingEvent::Finished) => Some(ProcessingState::Idle),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<&str> {
        match self {
            ProcessingState::Idle => None,
            ProcessingState::Uploading { label, .. } => Some(label.as_str()),
        }
    }
}

/// How a finished upload turned out when the call itself did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    /// A new analysis replaced the previous one.
    Analyzed,
    /// The backend answered but reported no usable analysis.
    Unsuccessful,
}

/// Owns the UI state and drives the connection check and upload workflow.
#[derive(Debug, Clone)]
pub struct WorkflowController {
    connection: ConnectionState,
    processing: ProcessingState,
    analysis: Option<AnalysisResult>,
    progress: Option<UploadProgress>,
    last_rejection: Option<ValidationError>,
    last_error: Option<ServiceError>,
    logger: Vec<LogMessage>,
    log_seq: u64,
    policy: UploadFailurePolicy,
    create_notebook: bool,
}

impl Default for WorkflowController {
    fn default() -> Self {
        Self::new(UploadFailurePolicy::default(), true)
    }
}

impl WorkflowController {
    pub fn new(policy: UploadFailurePolicy, create_notebook: bool) -> Self {
        Self {
            connection: ConnectionState::Checking,
            processing: ProcessingState::Idle,
            analysis: None,
            progress: None,
            last_rejection: None,
            last_error: None,
            logger: Vec::new(),
            log_seq: 0,
            policy,
            create_notebook,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.upload_failure_policy, config.create_notebook)
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    pub fn processing_status(&self) -> Option<&str> {
        self.processing.status()
    }

    pub fn analysis(&self) -> Option<&AnalysisResult> {
        self.analysis.as_ref()
    }

    pub fn upload_progress(&self) -> Option<UploadProgress> {
        self.progress
    }

    pub fn last_rejection(&self) -> Option<&ValidationError> {
        self.last_rejection.as_ref()
    }

    pub fn last_error(&self) -> Option<&ServiceError> {
        self.last_error.as_ref()
    }

    pub fn logger(&self) -> &[LogMessage] {
        &self.logger
    }

    pub fn create_notebook(&self) -> bool {
        self.create_notebook
    }

    pub fn can_upload(&self) -> bool {
        self.connection == ConnectionState::Connected && self.processing == ProcessingState::Idle
    }

    pub fn show_retry(&self) -> bool {
        self.connection == ConnectionState::Disconnected
    }

    pub fn latest_log_seq(&self) -> Option<u64> {
        self.logger.last().map(|entry| entry.seq)
    }

    /// Clear the log only if `seq` is still its latest entry. Returns whether it cleared.
    pub fn clear_log_if_latest(&mut self, seq: u64) -> bool {
        if self.latest_log_seq() != Some(seq) {
            return false;
        }
        self.logger.clear();
        true
    }

    fn log(&mut self, level: LogLevel, message: impl Into<String>) {
        if self.logger.len() >= MAX_LOG_ENTRIES {
            self.logger.remove(0);
        }
        self.log_seq += 1;
        self.logger.push(LogMessage::new(self.log_seq, level, message));
    }

    // --- connection check ---

    pub fn begin_initialize(&mut self) {
        info!("Attempting connection to the analysis backend...");
        self.connection = self.connection.on(ConnectionEvent::CheckStarted);
        self.log(LogLevel::Info, "Checking backend connection...");
    }

    pub fn finish_initialize(&mut self, result: Result<SetupResponse, ServiceError>) -> ConnectionState {
        let event = match result {
            Ok(resp) if resp.success => {
                info!("Backend connection successful");
                self.last_error = None;
                self.log(LogLevel::Success, "Connected to backend");
                ConnectionEvent::CheckSucceeded
            }
            Ok(resp) => {
                warn!("Backend reported an unsuccessful setup: {:?}", resp.extra);
                self.log(LogLevel::Error, "Backend setup reported failure");
                ConnectionEvent::CheckFailed
            }
            Err(e) => {
                error!("Failed to initialize: {}", e);
                self.log(LogLevel::Error, e.to_string());
                self.last_error = Some(e);
                ConnectionEvent::CheckFailed
            }
        };
        self.connection = self.connection.on(event);
        self.connection
    }

    /// Run the connectivity check. Safe to call again as a manual retry.
    pub async fn initialize<B>(&mut self, backend: &B) -> ConnectionState
    where
        B: AnalysisBackend + ?Sized,
    {
        self.begin_initialize();
        let result = backend.check_connection().await;
        self.finish_initialize(result)
    }

    // --- file selection and upload ---

    /// Validate a selection. Rejections are logged and remembered, never sent.
    pub fn handle_file_selected(&mut self, file: Option<UploadedFile>) -> Result<UploadedFile, ValidationError> {
        if let Err(e) = validate_upload(file.as_ref()) {
            warn!("Rejected file selection: {}", e);
            self.log(LogLevel::Warning, e.to_string());
            self.last_rejection = Some(e.clone());
            return Err(e);
        }
        self.last_rejection = None;
        file.ok_or(ValidationError::NoFile)
    }

    pub fn reject_selection(&mut self, error: ValidationError) {
        warn!("Rejected file selection: {}", error);
        self.log(LogLevel::Warning, error.to_string());
        self.last_rejection = Some(error);
    }

    pub fn begin_processing(&mut self, file_name: &str) -> Result<(), WorkflowError> {
        if self.connection != ConnectionState::Connected {
            return Err(WorkflowError::NotConnected);
        }
        let next = self
            .processing
            .on(ProcessingEvent::Started { file_name: file_name.to_string() })
            .ok_or(WorkflowError::Busy)?;
        info!("Processing {}", file_name);
        self.processing = next;
        self.progress = None;
        self.log(LogLevel::Info, format!("Uploading {}...", file_name));
        Ok(())
    }

    pub fn record_progress(&mut self, progress: UploadProgress) {
        if self.processing != ProcessingState::Idle {
            self.progress = Some(progress);
        }
    }

    pub fn finish_processing(
        &mut self,
        result: Result<UploadAnalyzeResponse, ServiceError>,
    ) -> Result<UploadOutcome, WorkflowError> {
        if let Some(next) = self.processing.on(ProcessingEvent::Finished) {
            self.processing = next;
        }
        self.progress = None;

        match result {
            Ok(UploadAnalyzeResponse { success: true, analysis: Some(analysis), .. }) => {
                info!(
                    "Analysis received: {} responses ({} failed)",
                    analysis.responses.len(),
                    analysis.failed_prompts()
                );
                self.analysis = Some(analysis);
                self.last_error = None;
                self.log(LogLevel::Success, "Analysis complete");
                Ok(UploadOutcome::Analyzed)
            }
            Ok(resp) => {
                warn!("Backend returned no analysis (success={})", resp.success);
                self.log(LogLevel::Warning, "Backend returned no analysis");
                Ok(UploadOutcome::Unsuccessful)
            }
            Err(e) => {
                error!("Failed to process file: {}", e);
                if self.policy == UploadFailurePolicy::MarkDisconnected {
                    self.connection = self.connection.on(ConnectionEvent::UploadFailed);
                }
                self.log(LogLevel::Error, e.to_string());
                self.last_error = Some(e.clone());
                Err(WorkflowError::Service(e))
            }
        }
    }

    /// Upload an already validated file and apply the result.
    pub async fn process_file<B>(
        &mut self,
        backend: &B,
        file: UploadedFile,
        progress: Option<ProgressSender>,
    ) -> Result<UploadOutcome, WorkflowError>
    where
        B: AnalysisBackend + ?Sized,
    {
        self.begin_processing(&file.name)?;
        let result = backend.upload_and_analyze(&file, self.create_notebook, progress).await;
        self.finish_processing(result)
    }

    /// Validate a selection and, when it passes, upload it.
    pub async fn submit_file<B>(
        &mut self,
        backend: &B,
        file: Option<UploadedFile>,
        progress: Option<ProgressSender>,
    ) -> Result<UploadOutcome, WorkflowError>
    where
        B: AnalysisBackend + ?Sized,
    {
        let file = self.handle_file_selected(file)?;
        self.process_file(backend, file, progress).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn ok_setup(success: bool) -> Result<SetupResponse, ServiceError> {
        Ok(SetupResponse { success, extra: Map::new() })
    }

    fn analysis() -> AnalysisResult {
        AnalysisResult { responses: vec![], merged_summary: "done".into() }
    }

    #[test]
    fn connection_table() {
        use ConnectionEvent::*;
        use ConnectionState::*;
        assert_eq!(Disconnected.on(CheckStarted), Checking);
        assert_eq!(Checking.on(CheckSucceeded), Connected);
        assert_eq!(Checking.on(CheckFailed), Disconnected);
        assert_eq!(Connected.on(UploadFailed), Disconnected);
        assert_eq!(Checking.on(UploadFailed), Checking);
        assert_eq!(Connected.on(CheckFailed), Connected);
    }

    #[test]
    fn processing_table() {
        let idle = ProcessingState::Idle;
        let busy = idle.on(ProcessingEvent::Started { file_name: "a.pdf".into() }).unwrap();
        assert_eq!(busy.status(), Some(PROCESSING_LABEL));
        assert!(busy.on(ProcessingEvent::Started { file_name: "b.pdf".into() }).is_none());
        assert_eq!(busy.on(ProcessingEvent::Finished), Some(ProcessingState::Idle));
        assert!(idle.on(ProcessingEvent::Finished).is_none());
    }

    #[test]
    fn unsuccessful_setup_disconnects() {
        let mut ctl = WorkflowController::default();
        ctl.begin_initialize();
        assert_eq!(ctl.finish_initialize(ok_setup(false)), ConnectionState::Disconnected);
        assert!(ctl.show_retry());
        assert!(!ctl.can_upload());
    }

    #[test]
    fn begin_processing_guards() {
        let mut ctl = WorkflowController::default();
        assert_eq!(ctl.begin_processing("a.pdf"), Err(WorkflowError::NotConnected));

        ctl.begin_initialize();
        ctl.finish_initialize(ok_setup(true));
        ctl.begin_processing("a.pdf").unwrap();
        assert_eq!(ctl.begin_processing("b.pdf"), Err(WorkflowError::Busy));
        assert!(!ctl.can_upload());
    }

    #[test]
    fn keep_connection_policy_ignores_upload_failure() {
        let mut ctl = WorkflowController::new(UploadFailurePolicy::KeepConnection, true);
        ctl.begin_initialize();
        ctl.finish_initialize(ok_setup(true));
        ctl.begin_processing("a.pdf").unwrap();
        let err = ctl
            .finish_processing(Err(ServiceError::UploadFailed("502".into())))
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Service(ServiceError::UploadFailed(_))));
        assert_eq!(ctl.connection(), ConnectionState::Connected);
        assert_eq!(ctl.processing_status(), None);
    }

    #[test]
    fn unsuccessful_response_keeps_previous_analysis() {
        let mut ctl = WorkflowController::default();
        ctl.begin_initialize();
        ctl.finish_initialize(ok_setup(true));
        ctl.begin_processing("a.pdf").unwrap();
        ctl.finish_processing(Ok(UploadAnalyzeResponse {
            success: true,
            analysis: Some(analysis()),
            extra: Map::new(),
        }))
        .unwrap();

        ctl.begin_processing("b.pdf").unwrap();
        let outcome = ctl
            .finish_processing(Ok(UploadAnalyzeResponse { success: false, analysis: None, extra: Map::new() }))
            .unwrap();
        assert_eq!(outcome, UploadOutcome::Unsuccessful);
        assert_eq!(ctl.analysis(), Some(&analysis()));
        assert_eq!(ctl.connection(), ConnectionState::Connected);
    }

    #[test]
    fn progress_only_recorded_while_uploading() {
        let mut ctl = WorkflowController::default();
        ctl.record_progress(UploadProgress { sent: 1, total: 2 });
        assert_eq!(ctl.upload_progress(), None);

        ctl.begin_initialize();
        ctl.finish_initialize(ok_setup(true));
        ctl.begin_processing("a.pdf").unwrap();
        ctl.record_progress(UploadProgress { sent: 1, total: 2 });
        assert_eq!(ctl.upload_progress().map(|p| p.percent()), Some(50));
        ctl.finish_processing(Err(ServiceError::UploadFailed("reset".into()))).ok();
        assert_eq!(ctl.upload_progress(), None);
    }

    #[test]
    fn log_is_bounded() {
        let mut ctl = WorkflowController::default();
        for _ in 0..(MAX_LOG_ENTRIES + 10) {
            ctl.begin_initialize();
        }
        assert_eq!(ctl.logger().len(), MAX_LOG_ENTRIES);
        assert_eq!(ctl.latest_log_seq(), Some(MAX_LOG_ENTRIES as u64 + 10));
        assert!(ctl.clear_log_if_latest(MAX_LOG_ENTRIES as u64 + 10));
        assert!(ctl.logger().is_empty());
    }

    #[test]
    fn delayed_clear_spares_entries_logged_after_it() {
        let mut ctl = WorkflowController::default();
        ctl.begin_initialize();
        ctl.finish_initialize(ok_setup(true));
        let banner = ctl.latest_log_seq().unwrap();

        ctl.begin_processing("a.pdf").unwrap();
        ctl.finish_processing(Err(ServiceError::UploadFailed("Network Error".into())))
            .unwrap_err();

        assert!(!ctl.clear_log_if_latest(banner));
        let latest = ctl.logger().last().unwrap();
        assert_eq!(latest.level, LogLevel::Error);
        assert!(latest.message.contains("Network Error"));
        let error_seq = latest.seq;

        assert!(ctl.clear_log_if_latest(error_seq));
        assert!(ctl.logger().is_empty());
        assert!(!ctl.clear_log_if_latest(banner));
    }
}
