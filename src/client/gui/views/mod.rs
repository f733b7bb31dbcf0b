pub mod analysis_results;
pub mod logger;
pub mod status_bar;
pub mod upload_panel;
