//! embedfn CLI - validate embedding-function configs and embed text.

use std::fs;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use embedfn::{EmbeddingFunction, RawEmbedConfig, RemoteEmbeddingFunction};

/// embedfn CLI - drive a remote embedding function from the command line.
///
/// Configs are JSON objects carrying the persisted field names
/// (serviceUrl, model, encodingFormat, chunkSize, chunkOverlap,
/// chunkStrategy). Validation failures are printed verbatim, one line,
/// exactly as the library reports them.
#[derive(Parser)]
#[command(name = "embedfn")]
#[command(about = "Remote embedding function CLI")]
#[command(version)]
struct Cli {
    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run full validation on a config file
    Validate {
        /// Config file (JSON)
        #[arg(short = 'f', long = "file")]
        file: String,
    },
    /// Check a partial update against the immutability rules
    ValidateUpdate {
        /// Update file (JSON)
        #[arg(short = 'f', long = "file")]
        file: String,
    },
    /// Embed texts and print the vectors as JSON
    Embed {
        /// Config file (JSON)
        #[arg(short = 'f', long = "file")]
        file: String,

        /// Split each input on newlines before embedding
        #[arg(long)]
        lines: bool,

        /// Texts to embed
        #[arg(required = true)]
        texts: Vec<String>,
    },
}

fn load_raw_config(path: &str) -> anyhow::Result<RawEmbedConfig> {
    let data = fs::read_to_string(path).with_context(|| format!("read {path}"))?;
    serde_json::from_str(&data).with_context(|| format!("parse {path}"))
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_target(false)
            .init();
    }

    match &cli.command {
        Commands::Validate { file } => {
            let raw = load_raw_config(file)?;
            if let Err(e) = embedfn::validate_config(&raw) {
                println!("{e}");
                return Ok(ExitCode::FAILURE);
            }
            println!("valid");
            Ok(ExitCode::SUCCESS)
        }
        Commands::ValidateUpdate { file } => {
            let raw = load_raw_config(file)?;
            if let Err(e) = embedfn::validate_config_update(&raw) {
                println!("{e}");
                return Ok(ExitCode::FAILURE);
            }
            println!("valid");
            Ok(ExitCode::SUCCESS)
        }
        Commands::Embed { file, lines, texts } => {
            let mut raw = load_raw_config(file)?;
            if *lines {
                raw = raw.with_splitter(Arc::new(|text: &str| {
                    text.lines().map(str::to_string).collect()
                }));
            }
            let func = RemoteEmbeddingFunction::with_config(raw)?;
            let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
            let vectors = func.generate(&refs).await?;
            println!("{}", serde_json::to_string(&vectors)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}
