//! Command line helper sharing the server's extraction and summarization pipeline.
//!
//! Useful for checking what the server would extract from a PDF, or for trying the configured
//! backend without running the HTTP surface. Configuration is read from the same environment
//! variables as the server.
use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use rustysum::{config::Config, extraction, logging, summarization};

#[derive(Parser)]
#[command(
    name = "rustysum-cli",
    about = "Extract and summarize documents from the command line"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the text extracted from a PDF.
    Extract {
        /// Path to the PDF file.
        file: PathBuf,
    },
    /// Summarize a PDF or a literal text with the configured backend.
    Summarize {
        /// PDF file to extract and summarize.
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,
        /// Text to summarize.
        #[arg(long)]
        text: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();
    logging::init_cli_tracing();

    match cli.command {
        Command::Extract { file } => {
            let text = read_pdf_text(&file)?;
            println!("{text}");
        }
        Command::Summarize { file, text } => {
            let input = match (file, text) {
                (Some(file), _) => read_pdf_text(&file)?,
                (None, Some(text)) => text,
                (None, None) => bail!("either --file or --text is required"),
            };
            if input.trim().is_empty() {
                bail!("no text to summarize");
            }

            let config = Config::from_env().context("failed to load configuration")?;
            config.validate().context("invalid configuration")?;
            let client = summarization::build_summarization_client(&config)
                .context("failed to initialize summarization backend")?;
            let summary = client
                .summarize(&input)
                .await
                .with_context(|| format!("{} backend failed", client.name()))?;
            println!("{summary}");
        }
    }
    Ok(())
}

fn read_pdf_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    extraction::extract_text(&bytes)
        .with_context(|| format!("failed to extract text from {}", path.display()))
}
