use iced::Application;
use pdf_insight::client::gui::app::AnalyzerApp;
use pdf_insight::common::config::ClientConfig;

fn main() -> iced::Result {
    // load environment from .env (optional)
    let config = ClientConfig::from_env();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.log_level.as_str())).init();
    log::info!("Using analysis backend at {}", config.api_url);

    AnalyzerApp::run(iced::Settings::with_flags(config))
}
