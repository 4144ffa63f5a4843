//! Snippet Preview CLI
//!
//! Single-shot mode:
//!   snippet-preview [FILE] [--format html|json|data-url] [--config FILE]
//!
//! Server mode (persistent process, reads from stdin):
//!   snippet-preview --server [--config FILE]
//!
//! Protocol (server mode):
//!   Request (stdin):
//!     Length:42
//!
//!     export default function App() { ... }
//!
//!   Response (stdout):
//!     Status:Ok
//!     Platform:Claude Artifact
//!     Unresolved:
//!     Digest:3f2a...
//!     Length:1234
//!
//!     <!DOCTYPE html>...
//!
//!   Error response:
//!     Status:Error
//!     Length:42
//!
//!     Request body is not valid UTF-8: ...

use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use snippet_preview::protocol::{preview_headers, read_request, write_response};
use snippet_preview::{build_preview, NormalizationResult, Preview, PreviewConfig};
use std::io::Read;
use std::path::PathBuf;
use tokio::io::{AsyncWriteExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// The preview document
    Html,
    /// Normalization result plus the document, as JSON
    Json,
    /// The preview document as a `data:` URL
    DataUrl,
}

/// Turn an AI-generated component snippet into a standalone preview document
#[derive(Debug, Parser)]
#[command(name = "snippet-preview", version)]
struct Cli {
    /// Snippet file; reads stdin when absent or `-`
    #[arg(conflicts_with = "server")]
    file: Option<PathBuf>,

    /// Output format in single-shot mode
    #[arg(long, value_enum, default_value = "html")]
    format: Format,

    /// JSON file overriding CDN endpoints and registry entries
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Serve length-prefixed requests from stdin until it closes
    #[arg(long)]
    server: bool,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    result: &'a NormalizationResult,
    digest: String,
    document: &'a str,
}

fn load_config(path: Option<&PathBuf>) -> Result<PreviewConfig> {
    match path {
        Some(path) => PreviewConfig::load(path).map_err(|e| anyhow!("{}", e)),
        None => Ok(PreviewConfig::default()),
    }
}

fn read_snippet(file: Option<&PathBuf>) -> Result<String> {
    match file {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snippet '{}'", path.display())),
        _ => {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .context("Failed to read snippet from stdin")?;
            Ok(source)
        }
    }
}

fn log_diagnostics(preview: &Preview) {
    for diagnostic in &preview.result.diagnostics {
        warn!("{}", diagnostic);
    }
}

/// Run in single-shot mode
async fn run_single_shot(file: Option<&PathBuf>, format: Format, config: &PreviewConfig) -> Result<()> {
    let source = read_snippet(file)?;
    let preview = build_preview(&source, config);
    log_diagnostics(&preview);

    let output = match format {
        Format::Html => preview.document.as_str().to_string(),
        Format::DataUrl => preview.document.to_data_url(),
        Format::Json => serde_json::to_string_pretty(&JsonReport {
            result: &preview.result,
            digest: preview.document.digest(),
            document: preview.document.as_str(),
        })?,
    };

    let mut stdout = tokio::io::stdout();
    stdout.write_all(output.as_bytes()).await?;
    if !output.ends_with('\n') {
        stdout.write_all(b"\n").await?;
    }
    stdout.flush().await?;
    Ok(())
}

/// Run in server mode (persistent process, reads requests from stdin)
async fn run_server(config: &PreviewConfig) -> Result<()> {
    let mut reader = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();

    info!("Server ready, reading from stdin");

    loop {
        let body = match read_request(&mut reader).await {
            Ok(Some(body)) => body,
            // EOF - stdin closed, exit gracefully
            Ok(None) => break,
            Err(e) => {
                // The stream cannot be resynchronized after a bad header block
                write_response(&mut stdout, false, &[], &e.to_string()).await?;
                return Err(anyhow!("{}", e));
            }
        };

        let source = match String::from_utf8(body) {
            Ok(source) => source,
            Err(e) => {
                let message = format!("Request body is not valid UTF-8: {}", e);
                write_response(&mut stdout, false, &[], &message).await?;
                continue;
            }
        };

        let preview = build_preview(&source, config);
        log_diagnostics(&preview);
        write_response(
            &mut stdout,
            true,
            &preview_headers(&preview),
            preview.document.as_str(),
        )
        .await?;
    }

    info!("Server shutting down");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries documents; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    if cli.server {
        return run_server(&config).await;
    }

    run_single_shot(cli.file.as_ref(), cli.format, &config).await
}
