mod api;
mod config;
mod doctor_cmd;
mod providers;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::info;

use pinyinlens_logging::init_logger;
use pinyinlens_media::detect_mime_type;
use pinyinlens_pipeline::ProcessRequest;

use api::AppState;
use config::Config;

#[derive(Parser)]
#[command(name = "pinyinlens")]
#[command(about = "pinyinlens: Chinese text and pinyin from photos")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
        /// Address to bind the HTTP server to
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Run one local image through the pipeline and print the envelope
    Check {
        /// Image file to process
        #[arg(short, long)]
        file: PathBuf,
        /// Content type to declare; guessed from the extension when omitted
        #[arg(short, long)]
        content_type: Option<String>,
    },
    /// Show effective configuration and provider readiness
    Doctor,
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();
    let cli = Cli::parse();

    init_logger(&config.log_level, config.log_format, config.log_dir.as_deref());

    match cli.command {
        Commands::Serve { port, bind } => {
            let config = Config {
                port: port.unwrap_or(config.port),
                bind_address: bind.unwrap_or(config.bind_address),
                ..config
            };
            run_server(config).await?;
        }
        Commands::Check { file, content_type } => {
            run_check(&config, file, content_type).await?;
        }
        Commands::Doctor => doctor_cmd::run(&config).await?,
    }

    Ok(())
}

async fn run_server(config: Config) -> Result<()> {
    info!(
        port = config.port,
        bind = %config.bind_address,
        max_file_bytes = config.max_file_bytes,
        max_image_pixels = config.max_image_pixels,
        "Starting pinyinlens"
    );

    let app_state = Arc::new(AppState {
        assembler: providers::build_assembler(&config),
    });

    let app = api::build_router(app_state, &config.cors_allow_origins);
    let addr = format!("{}:{}", config.bind_address, config.port);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(addr = %addr, "HTTP API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn run_check(config: &Config, file: PathBuf, content_type: Option<String>) -> Result<()> {
    let bytes = tokio::fs::read(&file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let content_type =
        content_type.or_else(|| detect_mime_type(&file).map(str::to_string));

    let assembler = providers::build_assembler(config);
    let response = assembler
        .process(ProcessRequest::new(bytes, content_type))
        .await;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
