use std::sync::Arc;

use iced::widget::{Column, Container, Scrollable, Text};
use iced::{Application, Color, Command, Element, Length, Theme};
use log::warn;

use crate::client::gui::views::{analysis_results, logger::logger_view, status_bar, upload_panel};
use crate::client::models::app_state::{ConnectionState, UploadOutcome, WorkflowController};
use crate::client::models::messages::Message;
use crate::client::models::uploaded_file::UploadedFile;
use crate::client::services::analysis_service::{AnalysisBackend, AnalysisService};
use crate::client::services::progress::progress_channel;
use crate::common::config::ClientConfig;
use crate::common::error::{ServiceError, ValidationError};

const BG_MAIN: Color = Color::from_rgb(0.06, 0.07, 0.18);
const SUCCESS_BANNER_MS: u64 = 2500;

// Success banners disappear on their own unless something was logged after them.
fn clear_log_later(seq: Option<u64>) -> Command<Message> {
    let Some(seq) = seq else {
        return Command::none();
    };
    Command::perform(
        async move {
            tokio::time::sleep(tokio::time::Duration::from_millis(SUCCESS_BANNER_MS)).await;
            Message::ClearLog(seq)
        },
        |msg| msg,
    )
}

pub struct AnalyzerApp {
    pub state: WorkflowController,
    pub service: Result<Arc<AnalysisService>, ServiceError>,
    pub file_path: String,
}

impl AnalyzerApp {
    fn check_connection(&mut self) -> Command<Message> {
        self.state.begin_initialize();
        match &self.service {
            Ok(svc) => {
                let svc = svc.clone();
                Command::perform(async move { svc.check_connection().await }, Message::ConnectionChecked)
            }
            Err(e) => {
                // bad configuration: nothing to call, report as a failed check
                self.state.finish_initialize(Err(e.clone()));
                Command::none()
            }
        }
    }

    fn start_upload(&mut self, file: UploadedFile) -> Command<Message> {
        let svc = match &self.service {
            Ok(svc) => svc.clone(),
            Err(_) => return Command::none(),
        };
        if let Err(e) = self.state.begin_processing(&file.name) {
            warn!("Upload of {} not started: {}", file.name, e);
            return Command::none();
        }
        let create_notebook = self.state.create_notebook();
        let (tx, rx) = progress_channel();
        Command::batch([
            Command::perform(
                async move { svc.upload_and_analyze(&file, create_notebook, Some(tx)).await },
                Message::UploadFinished,
            ),
            Command::run(rx, Message::UploadProgressed),
        ])
    }
}

impl Application for AnalyzerApp {
    type Message = Message;
    type Theme = Theme;
    type Executor = iced::executor::Default;
    type Flags = ClientConfig;

    fn new(config: ClientConfig) -> (Self, Command<Message>) {
        let mut app = AnalyzerApp {
            state: WorkflowController::from_config(&config),
            service: AnalysisService::new(&config).map(Arc::new),
            file_path: String::new(),
        };
        // The connection check runs once at startup; later checks are manual retries.
        let cmd = app.check_connection();
        (app, cmd)
    }

    fn title(&self) -> String {
        "PDF Insight".to_string()
    }

    fn update(&mut self, message: Message) -> Command<Message> {
        match message {
            Message::RetryConnection => {
                if self.state.show_retry() {
                    return self.check_connection();
                }
            }
            Message::ConnectionChecked(result) => {
                if self.state.finish_initialize(result) == ConnectionState::Connected {
                    return clear_log_later(self.state.latest_log_seq());
                }
            }
            Message::FilePathChanged(path) => {
                self.file_path = path;
            }
            Message::SubmitFile => {
                if !self.state.can_upload() {
                    return Command::none();
                }
                let path = self.file_path.trim().to_string();
                if path.is_empty() {
                    self.state.reject_selection(ValidationError::NoFile);
                    return Command::none();
                }
                return Command::perform(UploadedFile::open(path), Message::FileLoaded);
            }
            Message::FileLoaded(Ok(file)) => {
                if let Ok(file) = self.state.handle_file_selected(Some(file)) {
                    return self.start_upload(file);
                }
            }
            Message::FileLoaded(Err(e)) => {
                self.state.reject_selection(e);
            }
            Message::UploadProgressed(progress) => {
                self.state.record_progress(progress);
            }
            Message::UploadFinished(result) => {
                // errors are already logged by the controller
                if let Ok(UploadOutcome::Analyzed) = self.state.finish_processing(result) {
                    return clear_log_later(self.state.latest_log_seq());
                }
            }
            Message::ClearLog(seq) => {
                self.state.clear_log_if_latest(seq);
            }
        }
        Command::none()
    }

    fn view(&self) -> Element<Message> {
        let content = Column::new()
            .spacing(20)
            .padding(24)
            .max_width(900.0)
            .push(Text::new("PDF Insight").size(28))
            .push(status_bar::view(&self.state))
            .push(upload_panel::view(&self.state, &self.file_path))
            .push(analysis_results::view(self.state.analysis()))
            .push(logger_view(self.state.logger()));

        Container::new(Scrollable::new(Container::new(content).width(Length::Fill).center_x()))
            .width(Length::Fill)
            .height(Length::Fill)
            .style(iced::theme::Container::Custom(Box::new(|_: &iced::Theme| {
                iced::widget::container::Appearance {
                    background: Some(iced::Background::Color(BG_MAIN)),
                    text_color: Some(Color::WHITE),
                    ..Default::default()
                }
            })))
            .into()
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }
}
