use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use futures::StreamExt;
use std::io::Write;

use pdf_insight::client::models::app_state::{ConnectionState, UploadOutcome, WorkflowController};
use pdf_insight::client::models::uploaded_file::UploadedFile;
use pdf_insight::client::services::analysis_service::AnalysisService;
use pdf_insight::client::services::progress::progress_channel;
use pdf_insight::common::config::ClientConfig;

#[derive(Parser, Debug)]
#[command(name = "pdf-insight", version, about = "Check the analysis backend and analyze PDF files")]
struct Cli {
    /// Backend base URL (overrides API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Check whether the backend can reach the data platform
    Check,
    /// Upload a PDF and print the analysis
    Analyze {
        file: PathBuf,
        /// Do not ask the backend to create a notebook
        #[arg(long)]
        no_notebook: bool,
        /// Print the analysis as JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = ClientConfig::from_env();
    if let Some(url) = cli.api_url.clone() {
        config = config.with_api_url(url);
    }
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.log_level.as_str())).init();

    if let Cmd::Analyze { no_notebook: true, .. } = &cli.command {
        config.create_notebook = false;
    }
    let service = AnalysisService::new(&config).context("building the HTTP client")?;
    let mut controller = WorkflowController::from_config(&config);

    let state = controller.initialize(&service).await;
    println!("[{}] {}", state.label(), config.api_url);
    if state != ConnectionState::Connected {
        match controller.last_error() {
            Some(e) => bail!("backend unavailable: {}", e),
            None => bail!("backend unavailable: setup reported failure"),
        }
    }

    let Cmd::Analyze { file, json, .. } = cli.command else {
        return Ok(());
    };

    let selected = UploadedFile::open(&file)
        .await
        .with_context(|| format!("opening {}", file.display()))?;
    let selected = controller.handle_file_selected(Some(selected))?;

    let (tx, mut rx) = progress_channel();
    let printer = tokio::spawn(async move {
        while let Some(progress) = rx.next().await {
            eprint!("\rUpload progress: {:>3}%", progress.percent());
            let _ = std::io::stderr().flush();
        }
        eprintln!();
    });
    let outcome = controller.process_file(&service, selected, Some(tx)).await;
    // the sender goes away with the request body, which ends the printer loop
    printer.await.ok();

    match outcome? {
        UploadOutcome::Analyzed => {}
        UploadOutcome::Unsuccessful => bail!("backend returned no analysis for {}", file.display()),
    }
    let Some(analysis) = controller.analysis() else {
        bail!("no analysis available");
    };

    if json {
        println!("{}", serde_json::to_string_pretty(analysis)?);
    } else {
        println!("AI Analysis Results");
        for block in analysis.blocks() {
            println!("\n{}", block);
        }
    }
    Ok(())
}
