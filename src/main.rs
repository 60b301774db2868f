use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use structify_lib::api::{start_processing_server, ApiContext};
use structify_lib::config::{self, AppConfig};
use structify_lib::db::SqliteResultStore;
use structify_lib::export::{export, ExportFormat};
use structify_lib::models::{RawDocument, MAX_FILE_SIZE};
use structify_lib::pipeline::backend::{RemoteService, RoutingMode};
use structify_lib::pipeline::processor::DocumentProcessor;

/// Turn documents into reviewable tables.
#[derive(Parser)]
#[command(name = "structify", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the remote processing service
    Serve {
        /// Address to bind (overrides STRUCTIFY_BIND)
        #[arg(long)]
        bind: Option<SocketAddr>,
    },
    /// Process one file and print the result
    Process {
        /// File to process
        file: PathBuf,

        /// Declared MIME type (guessed from the extension when omitted)
        #[arg(long)]
        mime: Option<String>,

        /// remote | local | remote-then-local (overrides STRUCTIFY_ROUTING)
        #[arg(long)]
        routing: Option<RoutingMode>,

        /// Print the table as csv | tsv | json instead of the full outcome
        #[arg(long)]
        export: Option<ExportFormat>,

        /// Persist the result to the SQLite store (STRUCTIFY_DB)
        #[arg(long)]
        store: bool,
    },
    /// Check whether the configured remote service is alive
    Probe,
}

#[tokio::main]
async fn main() -> Result<()> {
    structify_lib::init_tracing();
    let cli = Cli::parse();
    let config = AppConfig::from_env().context("Invalid configuration")?;

    tracing::info!("{} v{}", config::APP_NAME, config::APP_VERSION);

    match cli.command {
        Commands::Serve { bind } => serve(&config, bind.unwrap_or(config.bind)).await,
        Commands::Process {
            file,
            mime,
            routing,
            export,
            store,
        } => {
            process(
                &config,
                &file,
                mime,
                routing.unwrap_or(config.routing),
                export,
                store,
            )
            .await
        }
        Commands::Probe => probe(&config).await,
    }
}

async fn serve(config: &AppConfig, bind: SocketAddr) -> Result<()> {
    let ctx = ApiContext::local(config.structuring_engine()?);
    let mut server = start_processing_server(ctx, bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;

    println!("Structify processing service listening on {}", server.base_url());

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    server.shutdown();
    server.wait().await;
    Ok(())
}

async fn process(
    config: &AppConfig,
    file: &Path,
    mime: Option<String>,
    routing: RoutingMode,
    export_format: Option<ExportFormat>,
    store: bool,
) -> Result<()> {
    let content = tokio::fs::read(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    if content.len() as u64 > MAX_FILE_SIZE {
        bail!(
            "{} is {} bytes; the maximum is {MAX_FILE_SIZE}",
            file.display(),
            content.len()
        );
    }

    let declared_type = mime.unwrap_or_else(|| {
        mime_guess::from_path(file)
            .first_raw()
            .unwrap_or("application/octet-stream")
            .to_string()
    });
    let filename = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unknown".to_string());

    let mut processor = DocumentProcessor::for_mode(
        routing,
        Arc::new(config.remote_service()?),
        config.structuring_engine()?,
    );
    if store {
        let db = SqliteResultStore::open(&config.db_path)
            .with_context(|| format!("Failed to open {}", config.db_path.display()))?;
        processor = processor.with_store(Arc::new(db));
    }

    let document = RawDocument::new(filename, declared_type, content);
    let (outcome, result_id) = processor.process_and_store(document).await?;

    match export_format {
        Some(format) => print!("{}", export(&outcome.result, format)?),
        None => println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "outcome": outcome,
                "result_id": result_id,
            }))?
        ),
    }
    Ok(())
}

async fn probe(config: &AppConfig) -> Result<()> {
    let remote = config.remote_service()?;
    match remote.health().await {
        Ok(()) => {
            println!("{} is healthy", remote.endpoint());
            Ok(())
        }
        Err(e) => bail!("{} is unavailable: {e}", remote.endpoint()),
    }
}
