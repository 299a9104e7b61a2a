//! gemqa CLI - concise answers from Gemini in the terminal
//!
//! Usage:
//!   gemqa                       Start an interactive session
//!   gemqa "<question>"          Answer one question and exit
//!   gemqa -c gemqa.toml -v      Use a config file with debug logging

mod repl;

use anyhow::{Context, Result};
use clap::Parser;
use gemqa_agent::{get_api_key, GeminiClient};
use gemqa_core::QaConfig;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gemqa")]
#[command(author, version, about = "Ask Gemini concise questions from the terminal")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Config file (defaults to ./gemqa.toml if present)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Model name used in the endpoint path
    #[arg(long)]
    model: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Retry 429/5xx/connection/timeout failures with backoff (default: no retries)
    #[arg(long, value_name = "N")]
    max_retries: Option<u32>,

    /// Answer a single question and exit
    question: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load .env before logging so RUST_LOG can come from it
    let dotenv_result = dotenvy::dotenv();

    let level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = dotenv_result {
        // Only warn on errors other than file not found
        if !e.not_found() {
            warn!("Failed to load .env file: {}", e);
        }
    }

    let config = load_config(&cli)?;
    info!("Using endpoint {}", config.endpoint());

    let client = GeminiClient::new(&config).context("Failed to create Gemini client")?;
    let mut stdout = std::io::stdout();

    if let Some(question) = cli.question {
        repl::run_turn(&question, &mut stdout, &client)
            .await
            .context("Failed to write answer")?;
        return Ok(());
    }

    repl::print_banner(&mut stdout, &config.model)?;

    let lines = repl::spawn_line_reader(std::io::BufReader::new(std::io::stdin()));
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    repl::run_session(lines, &mut stdout, &client, interrupt).await;
    Ok(())
}

/// Defaults, then config file, then environment, then flags
fn load_config(cli: &Cli) -> Result<QaConfig> {
    let mut config = QaConfig::load(cli.config.as_deref())
        .context("Failed to load configuration")?
        .with_env_overrides();

    if let Some(model) = &cli.model {
        config.model = model.clone();
    }
    if let Some(timeout) = cli.timeout {
        config.timeout_secs = timeout;
    }
    if let Some(max_retries) = cli.max_retries {
        config.max_retries = max_retries;
    }

    let api_key = get_api_key(&config.api_key_env);
    Ok(config.with_api_key(api_key))
}
